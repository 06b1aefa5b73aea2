//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background queue worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the server process also runs a worker.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent batch processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Attempts allowed per queued batch before it is marked failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    /// Cron expression (with seconds) for the inbox cleanup job.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            max_attempts: default_max_attempts(),
            cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_attempts() -> i32 {
    3
}

fn default_cleanup_cron() -> String {
    "0 30 3 * * *".to_string()
}

//! Batch status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a queued batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "batch_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Waiting for a worker.
    Pending,
    /// Claimed by a worker.
    Running,
    /// Delivered.
    Completed,
    /// Gave up after the last attempt.
    Failed,
}

impl BatchStatus {
    /// Whether the batch will not run again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

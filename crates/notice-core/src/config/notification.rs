//! Notification behavior configuration: site identity, media, dispatch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How `send` hands work to the delivery backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Deliver inline before returning.
    #[default]
    Immediate,
    /// Persist the request as a batch for the worker.
    Queued,
    /// Deliver on a spawned task.
    Threaded,
}

/// One configured delivery medium.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Medium code stored in settings rows (one character, e.g. `"1"`).
    pub id: String,
    /// Backend implementation: `"website"` or `"email"`.
    pub label: String,
    /// Column header shown in the settings table.
    pub display: String,
    /// Notices are sent by default only when this is `<=` the notice type default.
    pub spam_sensitivity: i32,
}

/// Notification behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Site name exposed to templates as `current_site`.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Absolute root URL used to build links, without trailing slash.
    #[serde(default = "default_root_url")]
    pub root_url: String,
    /// Language used when the recipient has none.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Whether per-user languages are honored.
    #[serde(default = "default_true")]
    pub language_enabled: bool,
    /// Dispatch mode.
    #[serde(default)]
    pub dispatch: DispatchMode,
    /// Delivery media in settings-table column order.
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendConfig>,
    /// Path segment overrides for generated sender paths, keyed by content type.
    #[serde(default)]
    pub content_type_translations: HashMap<String, String>,
    /// Directory of `*.hbs` template overrides.
    #[serde(default)]
    pub template_dir: Option<String>,
    /// Archived notices older than this are removed by the cleanup job.
    #[serde(default = "default_cleanup_days")]
    pub cleanup_after_days: u32,
    /// Maximum stored notices per user.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            root_url: default_root_url(),
            default_language: default_language(),
            language_enabled: true,
            dispatch: DispatchMode::default(),
            backends: default_backends(),
            content_type_translations: HashMap::new(),
            template_dir: None,
            cleanup_after_days: default_cleanup_days(),
            max_stored_per_user: default_max_stored(),
        }
    }
}

impl NotificationConfig {
    /// Root URL with any trailing slash removed.
    pub fn root_url(&self) -> &str {
        self.root_url.trim_end_matches('/')
    }
}

fn default_site_name() -> String {
    "example.com".to_string()
}

fn default_root_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig {
            id: "1".to_string(),
            label: "website".to_string(),
            display: "On site".to_string(),
            spam_sensitivity: 1,
        },
        BackendConfig {
            id: "2".to_string(),
            label: "email".to_string(),
            display: "Email".to_string(),
            spam_sensitivity: 2,
        },
    ]
}

fn default_cleanup_days() -> u32 {
    90
}

fn default_max_stored() -> u64 {
    1000
}

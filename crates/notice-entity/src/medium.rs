//! Delivery media.
//!
//! Media are not stored; they are built from the configured backends at
//! startup and referenced by their one-character id in settings.

use serde::{Deserialize, Serialize};

use notice_core::config::notification::BackendConfig;

/// A delivery medium such as the website inbox or email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Medium {
    /// Single-character code stored in notice settings.
    pub id: String,
    /// Backend label, e.g. `"website"` or `"email"`.
    pub label: String,
    /// Column header on the settings page.
    pub display: String,
    /// A notice type is sent by default only when this is `<=` its
    /// default sensitivity.
    pub spam_sensitivity: i32,
}

impl Medium {
    /// Whether a fresh setting for a type of the given sensitivity is on.
    pub fn default_send(&self, default_sensitivity: i32) -> bool {
        self.spam_sensitivity <= default_sensitivity
    }
}

impl From<&BackendConfig> for Medium {
    fn from(config: &BackendConfig) -> Self {
        Self {
            id: config.id.clone(),
            label: config.label.clone(),
            display: config.display.clone(),
            spam_sensitivity: config.spam_sensitivity,
        }
    }
}

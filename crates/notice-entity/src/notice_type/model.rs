//! Notice type entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notice_core::types::id::NoticeTypeId;

/// Maximum length of a notice type label.
pub const LABEL_MAX_LEN: usize = 40;
/// Maximum length of a notice type display name.
pub const DISPLAY_MAX_LEN: usize = 50;
/// Maximum length of a notice type description.
pub const DESCRIPTION_MAX_LEN: usize = 100;
/// Spam sensitivity assigned when the caller does not pick one.
pub const DEFAULT_SENSITIVITY: i32 = 2;

/// A category of event that can trigger a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NoticeType {
    /// Unique identifier.
    pub id: NoticeTypeId,
    /// Unique machine label, e.g. `"friends_invite"`.
    pub label: String,
    /// Human-readable name.
    pub display: String,
    /// Longer description shown on the settings page.
    pub description: String,
    /// Notices of this type go out only through media whose spam
    /// sensitivity is less than or equal to this value.
    pub default_sensitivity: i32,
    /// When the type was registered.
    pub created_at: DateTime<Utc>,
    /// When the type was last changed.
    pub updated_at: DateTime<Utc>,
}

impl NoticeType {
    /// System types are flagged on the settings page.
    pub fn is_system(&self) -> bool {
        self.label.contains("system")
    }
}

/// Data required to register a notice type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoticeType {
    /// Unique label.
    pub label: String,
    /// Display name.
    pub display: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Default spam sensitivity.
    #[serde(default = "default_sensitivity")]
    pub default_sensitivity: i32,
}

impl CreateNoticeType {
    /// Whether an existing type already carries exactly these values.
    pub fn matches(&self, existing: &NoticeType) -> bool {
        existing.display == self.display
            && existing.description == self.description
            && existing.default_sensitivity == self.default_sensitivity
    }
}

fn default_sensitivity() -> i32 {
    DEFAULT_SENSITIVITY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice_type(label: &str) -> NoticeType {
        NoticeType {
            id: NoticeTypeId::new(),
            label: label.into(),
            display: "Display".into(),
            description: String::new(),
            default_sensitivity: DEFAULT_SENSITIVITY,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_system() {
        assert!(notice_type("system_message").is_system());
        assert!(notice_type("from_system_admin").is_system());
        assert!(!notice_type("friends_invite").is_system());
    }

    #[test]
    fn test_create_defaults_sensitivity() {
        let create: CreateNoticeType =
            serde_json::from_str(r#"{"label":"a","display":"A"}"#).expect("parse");
        assert_eq!(create.default_sensitivity, DEFAULT_SENSITIVITY);
        assert!(create.description.is_empty());
    }
}

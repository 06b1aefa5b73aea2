//! Notification language resolution.

use notice_core::config::NotificationConfig;
use notice_entity::user::User;

/// The language a user's notices are rendered in.
///
/// Falls back to `notification.default_language` when per-user languages
/// are disabled or the user has none.
pub fn notification_language(user: &User, config: &NotificationConfig) -> String {
    if config.language_enabled {
        if let Some(language) = user.language.as_deref().map(str::trim) {
            if !language.is_empty() {
                return language.to_string();
            }
        }
    }
    config.default_language.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notice_core::types::id::UserId;

    fn user(language: Option<&str>) -> User {
        User {
            id: UserId::new(),
            username: "ana".into(),
            email: None,
            language: language.map(str::to_string),
            is_active: true,
            is_superuser: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_language_wins() {
        let config = NotificationConfig::default();
        assert_eq!(notification_language(&user(Some("de")), &config), "de");
        assert_eq!(notification_language(&user(Some(" ")), &config), "en");
        assert_eq!(notification_language(&user(None), &config), "en");
    }

    #[test]
    fn test_disabled_languages_use_default() {
        let config = NotificationConfig {
            language_enabled: false,
            ..NotificationConfig::default()
        };
        assert_eq!(notification_language(&user(Some("de")), &config), "en");
    }
}

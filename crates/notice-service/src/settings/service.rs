//! Notice settings: lazy defaults, the settings table, and form updates.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_core::types::id::UserId;
use notice_database::store::{NoticeTypeStore, SettingStore};
use notice_entity::medium::Medium;
use notice_entity::notice_type::NoticeType;
use notice_entity::setting::NoticeSetting;

/// Value a checked form field carries.
const FORM_ON: &str = "on";

/// One notice type row of the settings table.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsRow {
    /// The notice type.
    pub notice_type: NoticeType,
    /// Whether the type is a system type.
    pub is_system: bool,
    /// `(form_label, send)` per medium in column order.
    pub cells: Vec<(String, bool)>,
}

/// The settings table of one user.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsTable {
    /// Medium display names in column order.
    pub column_headers: Vec<String>,
    /// One row per notice type, sorted by label.
    pub rows: Vec<SettingsRow>,
}

/// Reads and writes notice settings.
#[derive(Debug, Clone)]
pub struct SettingsService {
    settings: Arc<dyn SettingStore>,
    notice_types: Arc<dyn NoticeTypeStore>,
    media: Vec<Medium>,
}

/// Form field name of a settings cell.
pub fn form_label(notice_type: &NoticeType, medium: &Medium) -> String {
    format!("{}_{}", notice_type.label, medium.id)
}

impl SettingsService {
    /// Creates a new settings service for the configured media.
    pub fn new(
        settings: Arc<dyn SettingStore>,
        notice_types: Arc<dyn NoticeTypeStore>,
        media: Vec<Medium>,
    ) -> Self {
        Self {
            settings,
            notice_types,
            media,
        }
    }

    /// The configured media in column order.
    pub fn media(&self) -> &[Medium] {
        &self.media
    }

    /// Find a medium by backend label.
    pub fn medium_by_label(&self, label: &str) -> Option<&Medium> {
        self.media.iter().find(|m| m.label == label)
    }

    /// The stored setting, created on first access with the medium default.
    pub async fn get_setting(
        &self,
        user_id: UserId,
        notice_type: &NoticeType,
        medium: &Medium,
    ) -> AppResult<NoticeSetting> {
        self.settings
            .get_or_create(
                user_id,
                notice_type.id,
                &medium.id,
                medium.default_send(notice_type.default_sensitivity),
            )
            .await
    }

    /// Whether notices of this type go out through this medium.
    pub async fn should_send(
        &self,
        user_id: UserId,
        notice_type: &NoticeType,
        medium: &Medium,
    ) -> AppResult<bool> {
        Ok(self.get_setting(user_id, notice_type, medium).await?.send)
    }

    /// Build the settings table of a user.
    pub async fn settings_table(&self, user_id: UserId) -> AppResult<SettingsTable> {
        let mut rows = Vec::new();
        for notice_type in self.notice_types.list().await? {
            let mut cells = Vec::with_capacity(self.media.len());
            for medium in &self.media {
                let setting = self.get_setting(user_id, &notice_type, medium).await?;
                cells.push((form_label(&notice_type, medium), setting.send));
            }
            rows.push(SettingsRow {
                is_system: notice_type.is_system(),
                notice_type,
                cells,
            });
        }
        Ok(SettingsTable {
            column_headers: self.media.iter().map(|m| m.display.clone()).collect(),
            rows,
        })
    }

    /// Apply a submitted settings form. A cell is on exactly when its field
    /// is `"on"`. Returns whether anything changed.
    pub async fn apply_settings_form(
        &self,
        user_id: UserId,
        form: &HashMap<String, String>,
    ) -> AppResult<bool> {
        let mut changed = false;
        for notice_type in self.notice_types.list().await? {
            for medium in &self.media {
                let setting = self.get_setting(user_id, &notice_type, medium).await?;
                let wanted = form
                    .get(&form_label(&notice_type, medium))
                    .is_some_and(|v| v == FORM_ON);
                if wanted != setting.send {
                    self.settings
                        .set_send(user_id, notice_type.id, &medium.id, wanted)
                        .await?;
                    changed = true;
                }
            }
        }
        if changed {
            info!(user_id = %user_id, "Notification settings updated");
        }
        Ok(changed)
    }

    /// Turn a medium off for every notice type of a user.
    pub async fn disable_medium(&self, user_id: UserId, medium_label: &str) -> AppResult<Medium> {
        let medium = self
            .medium_by_label(medium_label)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Unknown medium '{medium_label}'")))?;
        let written = self.settings.disable_medium(user_id, &medium.id).await?;
        info!(user_id = %user_id, medium = %medium.label, written, "Medium disabled");
        Ok(medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_core::config::NotificationConfig;
    use notice_database::memory::MemoryStore;
    use notice_entity::notice_type::CreateNoticeType;

    async fn setup() -> (SettingsService, MemoryStore) {
        let store = MemoryStore::new();
        let media = NotificationConfig::default()
            .backends
            .iter()
            .map(Medium::from)
            .collect();
        let service = SettingsService::new(Arc::new(store.clone()), Arc::new(store.clone()), media);
        for (label, default) in [("comment", 2), ("system_alert", 1)] {
            NoticeTypeStore::insert(
                &store,
                &CreateNoticeType {
                    label: label.into(),
                    display: label.into(),
                    description: String::new(),
                    default_sensitivity: default,
                },
            )
            .await
            .unwrap();
        }
        (service, store)
    }

    #[tokio::test]
    async fn test_lazy_default_follows_sensitivity() {
        let (service, store) = setup().await;
        let user = UserId::new();
        let alert = store.find_by_label("system_alert").await.unwrap().unwrap();
        let media = service.media().to_vec();

        // website sensitivity 1 <= 1, email sensitivity 2 > 1
        assert!(service.should_send(user, &alert, &media[0]).await.unwrap());
        assert!(!service.should_send(user, &alert, &media[1]).await.unwrap());
    }

    #[tokio::test]
    async fn test_settings_table_layout() {
        let (service, _) = setup().await;
        let table = service.settings_table(UserId::new()).await.unwrap();
        assert_eq!(table.column_headers, vec!["On site", "Email"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].notice_type.label, "comment");
        assert!(!table.rows[0].is_system);
        assert!(table.rows[1].is_system);
        assert_eq!(
            table.rows[0].cells,
            vec![("comment_1".to_string(), true), ("comment_2".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_apply_form_turns_off_missing_fields() {
        let (service, _) = setup().await;
        let user = UserId::new();
        let mut form = HashMap::new();
        form.insert("comment_1".to_string(), "on".to_string());
        form.insert("system_alert_1".to_string(), "on".to_string());

        assert!(service.apply_settings_form(user, &form).await.unwrap());
        let table = service.settings_table(user).await.unwrap();
        assert_eq!(table.rows[0].cells[1], ("comment_2".to_string(), false));

        assert!(!service.apply_settings_form(user, &form).await.unwrap());
    }

    #[tokio::test]
    async fn test_disable_unknown_medium_not_found() {
        let (service, _) = setup().await;
        let err = service.disable_medium(UserId::new(), "sms").await.unwrap_err();
        assert!(err.is_not_found());
    }
}

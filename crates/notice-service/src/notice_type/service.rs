//! Notice type registration and lookup.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_database::store::NoticeTypeStore;
use notice_entity::notice_type::{
    CreateNoticeType, DESCRIPTION_MAX_LEN, DISPLAY_MAX_LEN, LABEL_MAX_LEN, NoticeType,
};

/// What `create_notice_type` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeChange {
    /// A new type was stored.
    Created,
    /// An existing type got new values.
    Updated,
    /// The stored type already had these values.
    Unchanged,
}

/// Registers and looks up notice types.
#[derive(Debug, Clone)]
pub struct NoticeTypeService {
    store: Arc<dyn NoticeTypeStore>,
}

impl NoticeTypeService {
    /// Creates a new notice type service.
    pub fn new(store: Arc<dyn NoticeTypeStore>) -> Self {
        Self { store }
    }

    /// Create a type, or bring an existing type with the same label up to date.
    ///
    /// Meant to be called by host applications on every deploy, so it is
    /// idempotent.
    pub async fn create_notice_type(
        &self,
        data: CreateNoticeType,
    ) -> AppResult<(NoticeType, TypeChange)> {
        validate(&data)?;

        if let Some(existing) = self.store.find_by_label(&data.label).await? {
            if data.matches(&existing) {
                return Ok((existing, TypeChange::Unchanged));
            }
            let updated = self.store.update(existing.id, &data).await?;
            info!(label = %updated.label, "Updated notice type");
            return Ok((updated, TypeChange::Updated));
        }

        let created = self.store.insert(&data).await?;
        info!(label = %created.label, "Created notice type");
        Ok((created, TypeChange::Created))
    }

    /// Look up a type by label.
    pub async fn get(&self, label: &str) -> AppResult<NoticeType> {
        self.store
            .find_by_label(label)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notice type '{label}' not found")))
    }

    /// All types sorted by label.
    pub async fn list(&self) -> AppResult<Vec<NoticeType>> {
        self.store.list().await
    }
}

fn validate(data: &CreateNoticeType) -> AppResult<()> {
    if data.label.is_empty() || data.label.chars().count() > LABEL_MAX_LEN {
        return Err(AppError::validation(format!(
            "label must be 1 to {LABEL_MAX_LEN} characters"
        )));
    }
    if data.label.chars().any(char::is_whitespace) || data.label.contains('/') {
        return Err(AppError::validation(
            "label must not contain whitespace or '/'",
        ));
    }
    if data.display.is_empty() || data.display.chars().count() > DISPLAY_MAX_LEN {
        return Err(AppError::validation(format!(
            "display must be 1 to {DISPLAY_MAX_LEN} characters"
        )));
    }
    if data.description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(AppError::validation(format!(
            "description must be at most {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}

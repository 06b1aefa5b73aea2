//! Turns a medium off for the user a signed code was issued to.

use std::sync::Arc;

use serde::Serialize;

use notice_backend::backend::EMAIL;
use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_core::types::id::UserId;
use notice_database::store::UserStore;

use crate::auth::UnsubscribeSigner;
use crate::settings::SettingsService;

/// Result shown to the user after unsubscribing.
#[derive(Debug, Clone, Serialize)]
pub struct UnsubscribeOutcome {
    /// The unsubscribed user.
    pub user_id: UserId,
    /// Label of the disabled medium.
    pub medium: String,
    /// Confirmation message.
    pub message: String,
}

/// Handles unsubscribe links.
#[derive(Debug, Clone)]
pub struct UnsubscribeService {
    signer: Arc<UnsubscribeSigner>,
    users: Arc<dyn UserStore>,
    settings: Arc<SettingsService>,
}

impl UnsubscribeService {
    /// Creates a new unsubscribe service.
    pub fn new(
        signer: Arc<UnsubscribeSigner>,
        users: Arc<dyn UserStore>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            signer,
            users,
            settings,
        }
    }

    /// Disable `medium_label` for the user `code` was signed for. An
    /// unknown medium, a bad code or an unknown user are all `NotFound`.
    pub async fn unsubscribe(&self, medium_label: &str, code: &str) -> AppResult<UnsubscribeOutcome> {
        if self.settings.medium_by_label(medium_label).is_none() {
            return Err(AppError::not_found(format!("Unknown medium '{medium_label}'")));
        }
        let user_id = self
            .signer
            .unsign(code)
            .map_err(|_| AppError::not_found("Unsubscribe link is not valid"))?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Unsubscribe link is not valid"))?;

        let medium = self.settings.disable_medium(user.id, medium_label).await?;
        let message = if medium.label == EMAIL {
            format!(
                "Your email address ({}) will no longer receive any other email notification from us.",
                user.email.as_deref().unwrap_or_default()
            )
        } else {
            format!("You will no longer receive any notices by {}.", medium.display)
        };
        Ok(UnsubscribeOutcome {
            user_id: user.id,
            medium: medium.label,
            message,
        })
    }
}

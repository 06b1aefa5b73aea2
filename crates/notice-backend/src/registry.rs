//! Backend registry built from `notification.backends`.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use notice_core::config::{EmailConfig, NotificationConfig};
use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_database::store::NoticeStore;
use notice_entity::medium::Medium;

use crate::backend::{DeliveryBackend, EMAIL, WEBSITE};
use crate::email::EmailBackend;
use crate::templates::TemplateRenderer;
use crate::transport::MailTransport;
use crate::website::WebsiteBackend;

/// The configured delivery backends in settings-table order.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn DeliveryBackend>>,
}

impl BackendRegistry {
    /// Build one backend per configured medium.
    pub fn from_config(
        notification: &NotificationConfig,
        email: &EmailConfig,
        renderer: Arc<TemplateRenderer>,
        notices: Arc<dyn NoticeStore>,
        transport: Arc<dyn MailTransport>,
    ) -> AppResult<Self> {
        let mut backends: Vec<Arc<dyn DeliveryBackend>> = Vec::new();
        for config in &notification.backends {
            let medium = Medium::from(config);
            let backend: Arc<dyn DeliveryBackend> = match config.label.as_str() {
                WEBSITE => Arc::new(WebsiteBackend::new(
                    medium,
                    Arc::clone(&renderer),
                    Arc::clone(&notices),
                )),
                EMAIL => Arc::new(EmailBackend::new(
                    medium,
                    email,
                    Arc::clone(&renderer),
                    Arc::clone(&transport),
                )?),
                other => {
                    return Err(AppError::configuration(format!(
                        "Unknown notification backend: '{other}'. Supported: website, email"
                    )));
                }
            };
            backends.push(backend);
        }
        let registry = Self::from_backends(backends)?;
        info!(
            media = ?registry.media().iter().map(|m| m.label.as_str()).collect::<Vec<_>>(),
            "Notification backends ready"
        );
        Ok(registry)
    }

    /// Build a registry from existing backends, checking that medium ids
    /// and labels are unique.
    pub fn from_backends(backends: Vec<Arc<dyn DeliveryBackend>>) -> AppResult<Self> {
        let mut ids = HashSet::new();
        let mut labels = HashSet::new();
        for backend in &backends {
            let medium = backend.medium();
            if !ids.insert(medium.id.clone()) {
                return Err(AppError::configuration(format!(
                    "Duplicate medium id '{}'",
                    medium.id
                )));
            }
            if !labels.insert(medium.label.clone()) {
                return Err(AppError::configuration(format!(
                    "Backend '{}' configured twice",
                    medium.label
                )));
            }
        }
        Ok(Self { backends })
    }

    /// All media in configuration order.
    pub fn media(&self) -> Vec<Medium> {
        self.backends.iter().map(|b| b.medium().clone()).collect()
    }

    /// The website backend, if configured.
    pub fn website(&self) -> Option<&Arc<dyn DeliveryBackend>> {
        self.by_label(WEBSITE)
    }

    /// Every backend except the website one.
    pub fn others(&self) -> impl Iterator<Item = &Arc<dyn DeliveryBackend>> {
        self.backends.iter().filter(|b| b.medium().label != WEBSITE)
    }

    /// Find a backend by its label.
    pub fn by_label(&self, label: &str) -> Option<&Arc<dyn DeliveryBackend>> {
        self.backends.iter().find(|b| b.medium().label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_core::config::BackendConfig;
    use notice_database::memory::MemoryStore;

    use crate::transport::OutboxTransport;

    fn build(notification: &NotificationConfig) -> AppResult<BackendRegistry> {
        BackendRegistry::from_config(
            notification,
            &EmailConfig::default(),
            Arc::new(TemplateRenderer::new()?),
            Arc::new(MemoryStore::new()),
            Arc::new(OutboxTransport::new()),
        )
    }

    #[test]
    fn test_default_registry_order() {
        let registry = build(&NotificationConfig::default()).unwrap();
        let labels: Vec<String> = registry.media().into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["website", "email"]);
        assert!(registry.website().is_some());
        assert_eq!(registry.others().count(), 1);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = NotificationConfig::default();
        config.backends.push(BackendConfig {
            id: "3".into(),
            label: "sms".into(),
            display: "SMS".into(),
            spam_sensitivity: 3,
        });
        let err = build(&config).unwrap_err();
        assert_eq!(err.kind, notice_core::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_duplicate_medium_id_rejected() {
        let mut config = NotificationConfig::default();
        config.backends[1].id = "1".into();
        assert!(build(&config).is_err());
    }
}

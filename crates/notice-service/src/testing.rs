//! Shared fixture for service tests: memory store, outbox, default config.

use std::sync::Arc;

use notice_backend::transport::OutboxTransport;
use notice_backend::{BackendRegistry, TemplateRenderer};
use notice_core::config::{AuthConfig, EmailConfig, NotificationConfig};
use notice_core::types::id::UserId;
use notice_database::memory::MemoryStore;
use notice_database::store::UserStore;
use notice_entity::notice_type::{CreateNoticeType, NoticeType};
use notice_entity::user::{UpsertUser, User};

use crate::auth::UnsubscribeSigner;
use crate::notice_type::NoticeTypeService;
use crate::notification::NotificationService;
use crate::settings::SettingsService;

pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub outbox: OutboxTransport,
    pub signer: Arc<UnsubscribeSigner>,
    pub notice_types: Arc<NoticeTypeService>,
    pub settings: Arc<SettingsService>,
    pub notification: Arc<NotificationService>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_renderer(TemplateRenderer::new().unwrap())
    }

    pub fn with_renderer(renderer: TemplateRenderer) -> Self {
        let config = NotificationConfig::default();
        let store = MemoryStore::new();
        let outbox = OutboxTransport::new();
        let registry = BackendRegistry::from_config(
            &config,
            &EmailConfig::default(),
            Arc::new(renderer),
            Arc::new(store.clone()),
            Arc::new(outbox.clone()),
        )
        .unwrap();
        let signer = Arc::new(UnsubscribeSigner::new(&AuthConfig::default()));
        let notice_types = Arc::new(NoticeTypeService::new(Arc::new(store.clone())));
        let settings = Arc::new(SettingsService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            registry.media(),
        ));
        let notification = Arc::new(NotificationService::new(
            Arc::new(store.clone()),
            Arc::clone(&notice_types),
            Arc::clone(&settings),
            registry,
            Arc::clone(&signer),
            config,
        ));
        Self {
            store,
            outbox,
            signer,
            notice_types,
            settings,
            notification,
        }
    }

    pub async fn user(&self, username: &str, email: Option<&str>) -> User {
        UserStore::upsert(
            &self.store,
            UpsertUser {
                id: UserId::new(),
                username: username.into(),
                email: email.map(str::to_string),
                language: None,
                is_active: true,
                is_superuser: false,
            },
        )
        .await
        .unwrap()
    }

    pub async fn notice_type(&self, label: &str, default_sensitivity: i32) -> NoticeType {
        self.notice_types
            .create_notice_type(CreateNoticeType {
                label: label.into(),
                display: format!("{label} display"),
                description: format!("{label} description"),
                default_sensitivity,
            })
            .await
            .unwrap()
            .0
    }
}

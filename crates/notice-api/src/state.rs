//! Application state shared across all handlers and middleware.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use notice_backend::transport::MailTransport;
use notice_backend::{BackendRegistry, TemplateRenderer};
use notice_core::config::AppConfig;
use notice_core::result::AppResult;
use notice_database::Stores;
use notice_service::{
    AccessTokenDecoder, Dispatcher, InboxService, NoticeTypeService, NotificationService,
    ObservationService, SettingsService, UnsubscribeService, UnsubscribeSigner, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Stores for the configured provider
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token decoder
    pub token_decoder: Arc<AccessTokenDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// User mirroring
    pub user_service: Arc<UserService>,
    /// Notice type registration
    pub notice_type_service: Arc<NoticeTypeService>,
    /// Notice settings
    pub settings_service: Arc<SettingsService>,
    /// Sending and broadcasting
    pub notification_service: Arc<NotificationService>,
    /// Dispatch by mode
    pub dispatcher: Arc<Dispatcher>,
    /// Observations
    pub observation_service: Arc<ObservationService>,
    /// Website inbox
    pub inbox_service: Arc<InboxService>,
    /// Unsubscribe links
    pub unsubscribe_service: Arc<UnsubscribeService>,
}

impl AppState {
    /// Wire every service on top of the given stores and mail transport.
    pub fn build(
        config: AppConfig,
        stores: Stores,
        transport: Arc<dyn MailTransport>,
    ) -> AppResult<Self> {
        let renderer = match &config.notification.template_dir {
            Some(dir) => TemplateRenderer::with_dir(Path::new(dir))?,
            None => TemplateRenderer::new()?,
        };
        let registry = BackendRegistry::from_config(
            &config.notification,
            &config.email,
            Arc::new(renderer),
            Arc::clone(&stores.notices),
            transport,
        )?;

        let token_decoder = Arc::new(AccessTokenDecoder::new(&config.auth));
        let signer = Arc::new(UnsubscribeSigner::new(&config.auth));

        let user_service = Arc::new(UserService::new(Arc::clone(&stores.users)));
        let notice_type_service =
            Arc::new(NoticeTypeService::new(Arc::clone(&stores.notice_types)));
        let settings_service = Arc::new(SettingsService::new(
            Arc::clone(&stores.settings),
            Arc::clone(&stores.notice_types),
            registry.media(),
        ));
        let notification_service = Arc::new(NotificationService::new(
            Arc::clone(&stores.users),
            Arc::clone(&notice_type_service),
            Arc::clone(&settings_service),
            registry,
            Arc::clone(&signer),
            config.notification.clone(),
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            config.notification.dispatch,
            Arc::clone(&notification_service),
            Arc::clone(&stores.queue),
            config.worker.max_attempts,
        ));
        let observation_service = Arc::new(ObservationService::new(
            Arc::clone(&stores.observations),
            Arc::clone(&notice_type_service),
            Arc::clone(&dispatcher),
        ));
        let inbox_service = Arc::new(InboxService::new(
            Arc::clone(&stores.notices),
            config.notification.content_type_translations.clone(),
        ));
        let unsubscribe_service = Arc::new(UnsubscribeService::new(
            signer,
            Arc::clone(&stores.users),
            Arc::clone(&settings_service),
        ));

        info!(dispatch = ?config.notification.dispatch, "Services initialized");

        Ok(Self {
            config: Arc::new(config),
            stores,
            token_decoder,
            user_service,
            notice_type_service,
            settings_service,
            notification_service,
            dispatcher,
            observation_service,
            inbox_service,
            unsubscribe_service,
        })
    }
}

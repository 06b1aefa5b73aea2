//! Sending and broadcasting notices through the configured backends.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use notice_backend::{BackendRegistry, Delivery, DeliveryBackend};
use notice_core::config::NotificationConfig;
use notice_core::result::AppResult;
use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;
use notice_database::store::UserStore;
use notice_entity::notice_type::NoticeType;
use notice_entity::user::User;

use super::request::{BroadcastRequest, EmitRequest, SendRequest};
use super::sender::{SENDER_PATH_KEY, sender_path};
use crate::auth::UnsubscribeSigner;
use crate::notice_type::NoticeTypeService;
use crate::settings::SettingsService;
use crate::user::notification_language;

/// A successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveredTo {
    /// Recipient.
    pub user_id: UserId,
    /// Backend label.
    pub medium: String,
}

/// A delivery a backend could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDelivery {
    /// Recipient.
    pub user_id: UserId,
    /// Backend label.
    pub medium: String,
    /// Error message.
    pub error: String,
}

/// Outcome of one `send` or `broadcast`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendReport {
    /// Notice type label.
    pub notice_type: String,
    /// Active recipients considered.
    pub recipients: usize,
    /// Deliveries made.
    pub delivered: Vec<DeliveredTo>,
    /// Requested users that are unknown or inactive.
    pub skipped: usize,
    /// Deliveries that failed.
    pub failed: Vec<FailedDelivery>,
}

/// Sends notices.
#[derive(Debug, Clone)]
pub struct NotificationService {
    users: Arc<dyn UserStore>,
    notice_types: Arc<NoticeTypeService>,
    settings: Arc<SettingsService>,
    registry: BackendRegistry,
    signer: Arc<UnsubscribeSigner>,
    config: NotificationConfig,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        users: Arc<dyn UserStore>,
        notice_types: Arc<NoticeTypeService>,
        settings: Arc<SettingsService>,
        registry: BackendRegistry,
        signer: Arc<UnsubscribeSigner>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            users,
            notice_types,
            settings,
            registry,
            signer,
            config,
        }
    }

    /// Look up a notice type by label.
    pub async fn notice_type(&self, label: &str) -> AppResult<NoticeType> {
        self.notice_types.get(label).await
    }

    /// Run a send or broadcast inline.
    pub async fn emit(&self, request: EmitRequest) -> AppResult<SendReport> {
        match request {
            EmitRequest::Send(request) => self.send(request).await,
            EmitRequest::Broadcast(request) => self.broadcast(request).await,
        }
    }

    /// Send a notice to every active user except `exclude`.
    pub async fn broadcast(&self, request: BroadcastRequest) -> AppResult<SendReport> {
        let users: Vec<User> = self
            .users
            .list_active()
            .await?
            .into_iter()
            .filter(|u| !request.exclude.contains(&u.id))
            .collect();
        let requested = users.len();
        let notice_type = self.notice_types.get(&request.label).await?;
        self.send_to(
            users,
            requested,
            &notice_type,
            request.extra_context,
            request.sender,
        )
        .await
    }

    /// Send a notice to a set of users.
    pub async fn send(&self, request: SendRequest) -> AppResult<SendReport> {
        let notice_type = self.notice_types.get(&request.label).await?;
        let mut ids = request.users;
        ids.sort_by_key(|id| id.into_uuid());
        ids.dedup();
        let users = self.users.find_many(&ids).await?;
        self.send_to(
            users,
            ids.len(),
            &notice_type,
            request.extra_context,
            request.sender,
        )
        .await
    }

    async fn send_to(
        &self,
        users: Vec<User>,
        requested: usize,
        notice_type: &NoticeType,
        extra_context: Map<String, Value>,
        sender: Option<ObjectRef>,
    ) -> AppResult<SendReport> {
        let root_url = self.config.root_url();
        let sender_path = sender_path(
            &extra_context,
            sender.as_ref(),
            &self.config.content_type_translations,
        );

        let mut report = SendReport {
            notice_type: notice_type.label.clone(),
            ..SendReport::default()
        };

        for user in users.into_iter().filter(|u| u.is_active) {
            report.recipients += 1;
            let base = self.base_context(&user, notice_type, sender.as_ref())?;
            let mut delivery = Delivery {
                language: notification_language(&user, &self.config),
                recipient: user,
                notice_type: notice_type.clone(),
                sender: sender.clone(),
                sender_path: Some(sender_path.clone()).filter(|p| !p.is_empty()),
                context: extra_context.clone(),
            };

            let website_notice = match self.registry.website() {
                Some(website) if self.accepts(website, &delivery).await? => {
                    if !sender_path.is_empty() {
                        delivery
                            .context
                            .insert(SENDER_PATH_KEY.into(), sender_path.clone().into());
                    }
                    let mut render_context = delivery.context.clone();
                    render_context.extend(base.clone());
                    let medium = website.medium().label.clone();
                    match website
                        .deliver(&Delivery {
                            context: render_context,
                            ..delivery.clone()
                        })
                        .await
                    {
                        Ok(stored) => {
                            report.delivered.push(DeliveredTo {
                                user_id: delivery.recipient.id,
                                medium,
                            });
                            stored.notice().cloned()
                        }
                        Err(e) => {
                            warn!(
                                user_id = %delivery.recipient.id,
                                medium = %medium,
                                notice_type = %notice_type.label,
                                error = %e,
                                "Notice delivery failed"
                            );
                            report.failed.push(FailedDelivery {
                                user_id: delivery.recipient.id,
                                medium,
                                error: e.to_string(),
                            });
                            None
                        }
                    }
                }
                _ => None,
            };

            match website_notice {
                Some(notice) => {
                    delivery.context.insert(
                        "sender_url".into(),
                        format!("{root_url}{}", notice.view_sender_path()).into(),
                    );
                    delivery.context.extend(notice.context_fields());
                }
                None => {
                    delivery.context.insert("notice_id".into(), false.into());
                    delivery
                        .context
                        .insert("sender_url".into(), format!("{root_url}{sender_path}").into());
                }
            }
            delivery.context.extend(base);

            for backend in self.registry.others() {
                if !self.accepts(backend, &delivery).await? {
                    continue;
                }
                let medium = backend.medium().label.clone();
                match backend.deliver(&delivery).await {
                    Ok(_) => report.delivered.push(DeliveredTo {
                        user_id: delivery.recipient.id,
                        medium,
                    }),
                    Err(e) => {
                        warn!(
                            user_id = %delivery.recipient.id,
                            medium = %medium,
                            notice_type = %notice_type.label,
                            error = %e,
                            "Notice delivery failed"
                        );
                        report.failed.push(FailedDelivery {
                            user_id: delivery.recipient.id,
                            medium,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        report.skipped = requested.saturating_sub(report.recipients);
        info!(
            notice_type = %report.notice_type,
            recipients = report.recipients,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            skipped = report.skipped,
            "Notices sent"
        );
        Ok(report)
    }

    /// Structural ability plus the user's setting for this type and medium.
    async fn accepts(
        &self,
        backend: &Arc<dyn DeliveryBackend>,
        delivery: &Delivery,
    ) -> AppResult<bool> {
        if !backend.accepts(&delivery.recipient) {
            return Ok(false);
        }
        self.settings
            .should_send(delivery.recipient.id, &delivery.notice_type, backend.medium())
            .await
    }

    /// Context every backend sees, layered over the extra context.
    fn base_context(
        &self,
        user: &User,
        notice_type: &NoticeType,
        sender: Option<&ObjectRef>,
    ) -> AppResult<Map<String, Value>> {
        let root_url = self.config.root_url();
        let code = self.signer.sign(user.id)?;
        let context = json!({
            "recipient": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
            },
            "sender": sender,
            "notice": {
                "label": notice_type.label,
                "display": notice_type.display,
                "description": notice_type.description,
            },
            "notices_url": format!("{root_url}/notices"),
            "root_url": root_url,
            "current_site": self.config.site_name,
            "unsubscribe_link": format!("{root_url}/notices/unsubscribe/email/{code}"),
        });
        Ok(match context {
            Value::Object(map) => map,
            _ => Map::new(),
        })
    }
}

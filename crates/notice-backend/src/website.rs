//! Website inbox backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use notice_core::result::AppResult;
use notice_database::store::NoticeStore;
use notice_entity::medium::Medium;
use notice_entity::notice::CreateNotice;
use notice_entity::user::User;

use crate::backend::{Delivery, DeliveryBackend, DeliveryReceipt};
use crate::templates::{NOTICE, TemplateRenderer};

/// Stores rendered notices in the recipient's inbox.
#[derive(Debug)]
pub struct WebsiteBackend {
    medium: Medium,
    renderer: Arc<TemplateRenderer>,
    notices: Arc<dyn NoticeStore>,
}

impl WebsiteBackend {
    /// Create a website backend.
    pub fn new(
        medium: Medium,
        renderer: Arc<TemplateRenderer>,
        notices: Arc<dyn NoticeStore>,
    ) -> Self {
        Self {
            medium,
            renderer,
            notices,
        }
    }
}

#[async_trait]
impl DeliveryBackend for WebsiteBackend {
    fn medium(&self) -> &Medium {
        &self.medium
    }

    fn accepts(&self, _user: &User) -> bool {
        true
    }

    async fn deliver(&self, delivery: &Delivery) -> AppResult<DeliveryReceipt> {
        let message = self.renderer.render(
            NOTICE,
            &delivery.notice_type.label,
            &delivery.language,
            &delivery.context,
        )?;

        let notice = self
            .notices
            .insert(CreateNotice {
                recipient_id: delivery.recipient.id,
                notice_type_id: delivery.notice_type.id,
                notice_type_label: delivery.notice_type.label.clone(),
                message,
                context: Value::Object(delivery.context.clone()),
                sender: delivery.sender.clone(),
                sender_path: delivery.sender_path.clone(),
                on_site: true,
            })
            .await?;

        debug!(
            notice_id = %notice.id,
            recipient = %delivery.recipient.id,
            notice_type = %delivery.notice_type.label,
            "Stored website notice"
        );
        Ok(DeliveryReceipt::Stored {
            notice: Box::new(notice),
        })
    }
}

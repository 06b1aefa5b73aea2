//! Email backend.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use tracing::debug;

use notice_core::config::EmailConfig;
use notice_core::error::{AppError, ErrorKind};
use notice_core::result::AppResult;
use notice_entity::medium::Medium;
use notice_entity::user::User;

use crate::backend::{Delivery, DeliveryBackend, DeliveryReceipt};
use crate::templates::{EMAIL_BODY, EMAIL_SUBJECT, TemplateRenderer};
use crate::transport::{MailTransport, OutgoingMail};

/// Renders notices as plain-text email and sends them through a transport.
#[derive(Debug)]
pub struct EmailBackend {
    medium: Medium,
    renderer: Arc<TemplateRenderer>,
    transport: Arc<dyn MailTransport>,
    from: Mailbox,
}

impl EmailBackend {
    /// Create an email backend. Fails when the configured sender address
    /// does not parse.
    pub fn new(
        medium: Medium,
        config: &EmailConfig,
        renderer: Arc<TemplateRenderer>,
        transport: Arc<dyn MailTransport>,
    ) -> AppResult<Self> {
        let from = config.from_header().parse::<Mailbox>().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid email.from_address: {e}"),
                e,
            )
        })?;
        Ok(Self {
            medium,
            renderer,
            transport,
            from,
        })
    }
}

/// Subjects are a single line.
fn single_line(subject: &str) -> String {
    subject
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl DeliveryBackend for EmailBackend {
    fn medium(&self) -> &Medium {
        &self.medium
    }

    fn accepts(&self, user: &User) -> bool {
        user.has_email()
    }

    async fn deliver(&self, delivery: &Delivery) -> AppResult<DeliveryReceipt> {
        let address = delivery
            .recipient
            .email
            .as_deref()
            .ok_or_else(|| AppError::delivery("Recipient has no email address"))?;
        let to = address.trim().parse::<Mailbox>().map_err(|e| {
            AppError::with_source(
                ErrorKind::Delivery,
                format!("Invalid recipient address '{address}': {e}"),
                e,
            )
        })?;

        let label = &delivery.notice_type.label;
        let subject = self.renderer.render(
            EMAIL_SUBJECT,
            label,
            &delivery.language,
            &delivery.context,
        )?;
        let body = self
            .renderer
            .render(EMAIL_BODY, label, &delivery.language, &delivery.context)?;

        let mail = OutgoingMail {
            from: self.from.clone(),
            to,
            subject: single_line(&subject),
            body,
        };
        let reference = self.transport.send(&mail).await?;

        debug!(recipient = %delivery.recipient.id, notice_type = %label, "Sent notice email");
        Ok(DeliveryReceipt::Emailed {
            to: mail.to.email.to_string(),
            reference,
        })
    }
}

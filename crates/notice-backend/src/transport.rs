//! Mail transports used by the email backend.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use notice_core::config::{EmailConfig, MailTransportKind};
use notice_core::error::{AppError, ErrorKind};
use notice_core::result::AppResult;

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender mailbox.
    pub from: Mailbox,
    /// Recipient mailbox.
    pub to: Mailbox,
    /// Single-line subject.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl OutgoingMail {
    /// Build the lettre message.
    pub fn to_message(&self) -> AppResult<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Delivery,
                    format!("Failed to build email: {e}"),
                    e,
                )
            })
    }
}

/// Something that can send an email.
#[async_trait]
pub trait MailTransport: Send + Sync + Debug {
    /// Send one email, returning a transport reference when available.
    async fn send(&self, mail: &OutgoingMail) -> AppResult<Option<String>>;
}

/// Build the transport selected by `email.transport`.
pub fn build_transport(config: &EmailConfig) -> AppResult<Arc<dyn MailTransport>> {
    match config.transport {
        MailTransportKind::Smtp => {
            info!(host = %config.smtp_host, port = config.smtp_port, "Using SMTP mail transport");
            Ok(Arc::new(SmtpMailTransport::new(config)?))
        }
        MailTransportKind::Outbox => {
            info!("Using in-memory outbox mail transport");
            Ok(Arc::new(OutboxTransport::new()))
        }
    }
}

/// SMTP transport. Sends run on the blocking pool.
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: SmtpTransport,
}

impl Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailTransport").finish_non_exhaustive()
    }
}

impl SmtpMailTransport {
    /// Create an SMTP transport from configuration.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let builder = if config.use_tls {
            SmtpTransport::relay(&config.smtp_host).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("SMTP relay configuration error: {e}"),
                    e,
                )
            })?
        } else {
            SmtpTransport::builder_dangerous(&config.smtp_host)
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<Option<String>> {
        let message = mail.to_message()?;
        let transport = self.transport.clone();
        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::internal(format!("SMTP task failed: {e}")))?
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Delivery,
                    format!("SMTP delivery failed: {e}"),
                    e,
                )
            })?;
        Ok(response.first_word().map(str::to_string))
    }
}

/// An email captured by the outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMail {
    /// Sender header.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject.
    pub subject: String,
    /// Body.
    pub body: String,
}

/// Transport that keeps emails in memory instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct OutboxTransport {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl OutboxTransport {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far.
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailTransport for OutboxTransport {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<Option<String>> {
        // Building the message validates headers the same way SMTP would.
        mail.to_message()?;
        let mut sent = self.sent.lock().await;
        sent.push(SentMail {
            from: mail.from.to_string(),
            to: mail.to.email.to_string(),
            subject: mail.subject.clone(),
            body: mail.body.clone(),
        });
        debug!(to = %mail.to.email, count = sent.len(), "Email captured in outbox");
        Ok(Some(format!("outbox-{}", sent.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            from: "Notices <noreply@example.com>".parse().unwrap(),
            to: "ana@example.com".parse().unwrap(),
            subject: "Hi".into(),
            body: "Body".into(),
        }
    }

    #[tokio::test]
    async fn test_outbox_captures_mail() {
        let outbox = OutboxTransport::new();
        let reference = outbox.send(&mail()).await.unwrap();
        assert_eq!(reference.as_deref(), Some("outbox-1"));
        let sent = outbox.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@example.com");
        assert_eq!(sent[0].subject, "Hi");
    }

    #[test]
    fn test_build_outbox_by_default() {
        let transport = build_transport(&EmailConfig::default());
        assert!(transport.is_ok());
    }
}

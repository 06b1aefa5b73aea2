//! Email backend configuration.

use serde::{Deserialize, Serialize};

/// How outgoing mail leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Relay through an SMTP server.
    Smtp,
    /// Keep messages in a process-local outbox (development).
    #[default]
    Outbox,
}

/// Email delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Transport kind.
    #[serde(default)]
    pub transport: MailTransportKind,
    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username (empty for no authentication).
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Use STARTTLS/TLS relay.
    #[serde(default = "default_true")]
    pub use_tls: bool,
    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Optional sender display name.
    #[serde(default)]
    pub from_name: Option<String>,
    /// SMTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransportKind::default(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            use_tls: true,
            from_address: default_from_address(),
            from_name: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl EmailConfig {
    /// The `From:` header value.
    pub fn from_header(&self) -> String {
        match &self.from_name {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.from_address),
            _ => self.from_address.clone(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_from_address() -> String {
    "noreply@example.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

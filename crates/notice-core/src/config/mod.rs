//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod email;
pub mod logging;
pub mod notification;
pub mod worker;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, StoreProvider};
pub use self::email::{EmailConfig, MailTransportKind};
pub use self::logging::LoggingConfig;
pub use self::notification::{BackendConfig, DispatchMode, NotificationConfig};
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Environment variable prefix for overrides, e.g. `NOTICE__SERVER__PORT=9000`.
const ENV_PREFIX: &str = "NOTICE";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Secrets shared with the host application.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Notification behavior.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Email backend settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file plus `NOTICE__*` environment variables.
    ///
    /// A missing file is not an error; every field has a default.
    pub fn load(path: &str) -> Result<Self, AppError> {
        Self::load_layers(&[path])
    }

    /// Load a base file, an optional environment overlay, and environment variables.
    pub fn load_with_env(path: &str, env: &str) -> Result<Self, AppError> {
        let overlay = format!("config/{env}");
        Self::load_layers(&[path, overlay.as_str()])
    }

    fn load_layers(paths: &[&str]) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        for path in paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == StoreProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }

        let root = url::Url::parse(&self.notification.root_url).map_err(|e| {
            AppError::configuration(format!(
                "notification.root_url '{}' is not a valid URL: {e}",
                self.notification.root_url
            ))
        })?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(AppError::configuration(
                "notification.root_url must be an http or https URL",
            ));
        }

        if self.notification.backends.is_empty() {
            return Err(AppError::configuration(
                "notification.backends must list at least one medium",
            ));
        }

        let mut ids = HashSet::new();
        for backend in &self.notification.backends {
            if backend.id.chars().count() != 1 {
                return Err(AppError::configuration(format!(
                    "Medium id '{}' must be a single character",
                    backend.id
                )));
            }
            if !ids.insert(backend.id.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate medium id '{}'",
                    backend.id
                )));
            }
        }

        if self.worker.concurrency == 0 {
            return Err(AppError::configuration("worker.concurrency must be > 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.provider = StoreProvider::Memory;
        config
    }

    #[test]
    fn test_defaults_are_valid_for_memory_provider() {
        assert!(memory_config().validate().is_ok());
    }

    #[test]
    fn test_postgres_requires_url() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_duplicate_medium_ids_rejected() {
        let mut config = memory_config();
        config.notification.backends[1].id = "1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_root_url_must_be_http() {
        let mut config = memory_config();
        config.notification.root_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.notification.root_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_media_order() {
        let config = memory_config();
        let labels: Vec<&str> = config
            .notification
            .backends
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["website", "email"]);
    }

    #[test]
    fn test_from_header() {
        let mut email = EmailConfig::default();
        assert_eq!(email.from_header(), "noreply@example.com");
        email.from_name = Some("Notices".to_string());
        assert_eq!(email.from_header(), "Notices <noreply@example.com>");
    }
}

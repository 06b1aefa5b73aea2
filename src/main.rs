//! Notice Server: per-user notification delivery for a host application.
//!
//! Main entry point that loads configuration, sets up logging and starts
//! the HTTP server with its background worker.

use tracing_subscriber::{EnvFilter, fmt};

use notice_core::config::AppConfig;
use notice_core::error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting Notice v{}", env!("CARGO_PKG_VERSION"));

    notice_api::run_server(config).await.map_err(|e| {
        tracing::error!(error = %e, "Server error");
        anyhow::Error::new(e)
    })
}

/// Load configuration from file, environment overlay and `NOTICE__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("NOTICE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("NOTICE_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_with_env(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

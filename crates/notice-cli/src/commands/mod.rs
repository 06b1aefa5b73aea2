//! CLI command definitions and dispatch.

pub mod migrate;
pub mod queue;
pub mod send;
pub mod serve;
pub mod types;
pub mod worker;

use clap::{Parser, Subcommand};

use notice_api::AppState;
use notice_backend::transport::build_transport;
use notice_core::config::AppConfig;
use notice_core::error::AppError;
use notice_database::Stores;

use crate::output::OutputFormat;

/// Notice: per-user notification delivery for a host application
#[derive(Debug, Parser)]
#[command(name = "notice", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Notice server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Notice type management
    Types(types::TypesArgs),
    /// Send a notice to some users
    Send(send::SendArgs),
    /// Send a notice to every active user
    Broadcast(send::BroadcastArgs),
    /// Run the background worker
    Worker(worker::WorkerArgs),
    /// Queue inspection
    Queue(queue::QueueArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Types(args) => types::execute(args, &self.config, self.format).await,
            Commands::Send(args) => send::execute_send(args, &self.config, self.format).await,
            Commands::Broadcast(args) => {
                send::execute_broadcast(args, &self.config, self.format).await
            }
            Commands::Worker(args) => worker::execute(args, &self.config).await,
            Commands::Queue(args) => queue::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: wire the full application state without serving HTTP
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let stores = Stores::connect(&config.database, false).await?;
    let transport = build_transport(&config.email)?;
    AppState::build(config, stores, transport)
}

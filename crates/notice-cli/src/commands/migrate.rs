//! Database migration management commands.

use clap::{Args, Subcommand};

use notice_core::config::StoreProvider;
use notice_core::error::AppError;
use notice_database::DatabasePool;
use notice_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    if config.database.provider != StoreProvider::Postgres {
        return Err(AppError::configuration(
            "Migrations need database.provider = \"postgres\"",
        ));
    }

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            let pool = DatabasePool::connect(&config.database).await?;
            run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}

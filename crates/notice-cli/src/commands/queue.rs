//! Queue inspection commands.

use clap::{Args, Subcommand};

use notice_core::error::AppError;
use notice_database::store::QueueStore;

use crate::output::{self, OutputFormat};

/// Arguments for queue commands
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Queue subcommand
    #[command(subcommand)]
    pub command: QueueCommand,
}

/// Queue subcommands
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Show batch counts by status
    Stats,
}

/// Execute queue commands
pub async fn execute(
    args: &QueueArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = super::build_state(config).await?;

    match &args.command {
        QueueCommand::Stats => {
            let stats = state.stores.queue.stats().await?;
            match format {
                OutputFormat::Json => output::print_item(&stats, format),
                OutputFormat::Table => {
                    println!("Queue Status:");
                    output::print_kv("Pending", &stats.pending.to_string());
                    output::print_kv("Running", &stats.running.to_string());
                    output::print_kv("Completed", &stats.completed.to_string());
                    output::print_kv("Failed", &stats.failed.to_string());
                    output::print_kv("Worker Enabled", &state.config.worker.enabled.to_string());
                    output::print_kv("Concurrency", &state.config.worker.concurrency.to_string());
                }
            }
        }
    }

    state.stores.close().await;
    Ok(())
}

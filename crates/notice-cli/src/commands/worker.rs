//! Background worker commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use tokio::sync::watch;

use notice_core::error::AppError;
use notice_worker::CronScheduler;

use crate::output;

/// Arguments for worker commands
#[derive(Debug, Args)]
pub struct WorkerArgs {
    /// Worker subcommand
    #[command(subcommand)]
    pub command: WorkerCommand,
}

/// Worker subcommands
#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    /// Process queued batches
    Run {
        /// Process what is queued now and exit
        #[arg(long)]
        once: bool,
    },
}

/// Execute worker commands
pub async fn execute(args: &WorkerArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = super::build_state(config).await?;
    let (queue, runner) = notice_api::build_worker(&state);

    match &args.command {
        WorkerCommand::Run { once: true } => {
            let processed = runner.drain().await?;
            output::print_success(&format!("Processed {processed} batch(es)"));
        }
        WorkerCommand::Run { once: false } => {
            let mut scheduler = CronScheduler::new(Arc::clone(&queue)).await?;
            scheduler
                .register_notice_cleanup(&state.config.worker.cleanup_cron)
                .await?;
            scheduler.start().await?;

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = shutdown_tx.send(true);
                }
            });

            println!("Worker running. Press Ctrl+C to stop.");
            runner.run(shutdown_rx).await;
            scheduler.shutdown().await?;
        }
    }

    state.stores.close().await;
    Ok(())
}

//! Application builder: wires state, router, worker and scheduler.

use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use uuid::Uuid;

use notice_backend::transport::build_transport;
use notice_core::config::AppConfig;
use notice_core::error::AppError;
use notice_database::Stores;
use notice_worker::jobs::{EmitNoticesJobHandler, NoticeCleanupJobHandler};
use notice_worker::{CronScheduler, JobExecutor, JobQueue, WorkerRunner};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the job queue and a worker with every handler registered.
pub fn build_worker(state: &AppState) -> (Arc<JobQueue>, WorkerRunner) {
    let config = &state.config;
    let queue = Arc::new(JobQueue::new(
        Arc::clone(&state.stores.queue),
        config.worker.max_attempts,
    ));

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(EmitNoticesJobHandler::new(Arc::clone(
        &state.notification_service,
    ))));
    executor.register(Arc::new(NoticeCleanupJobHandler::new(
        Arc::clone(&state.stores.notices),
        config.notification.cleanup_after_days,
        config.notification.max_stored_per_user,
    )));

    let worker_id = format!("worker-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let runner = WorkerRunner::new(
        Arc::clone(&queue),
        Arc::new(executor),
        config.worker.clone(),
        worker_id,
    );
    (queue, runner)
}

/// Runs the Notice server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Notice server...");

    let stores = Stores::connect(&config.database, true).await?;
    let transport = build_transport(&config.email)?;
    let state = AppState::build(config, stores, transport)?;
    let config = Arc::clone(&state.config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut scheduler = None;
    let worker_handle = if config.worker.enabled {
        let (queue, runner) = build_worker(&state);

        let cron = CronScheduler::new(Arc::clone(&queue)).await?;
        cron.register_notice_cleanup(&config.worker.cleanup_cron)
            .await?;
        cron.start().await?;
        scheduler = Some(cron);

        Some(tokio::spawn(async move {
            runner.run(shutdown_rx).await;
        }))
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    let stores = state.stores.clone();
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Notice server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(mut cron) = scheduler {
        if let Err(e) = cron.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }
    if let Some(handle) = worker_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Worker task panicked");
        }
    }
    stores.close().await;

    tracing::info!("Notice server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

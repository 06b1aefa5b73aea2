//! Cron scheduler for the periodic inbox cleanup.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use notice_core::error::AppError;
use notice_core::result::AppResult;

use crate::jobs::cleanup::NOTICE_CLEANUP_JOB;
use crate::queue::JobQueue;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish_non_exhaustive()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, queue })
    }

    /// Start the scheduler
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Enqueue a `notice_cleanup` batch on every tick of `schedule`
    /// (six-field cron expression with seconds).
    pub async fn register_notice_cleanup(&self, schedule: &str) -> AppResult<()> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                tracing::debug!("Scheduling notice cleanup batch");
                let payload = serde_json::json!({ "task": NOTICE_CLEANUP_JOB });
                if let Err(e) = queue.enqueue(NOTICE_CLEANUP_JOB, payload).await {
                    tracing::error!(error = %e, "Failed to enqueue notice_cleanup");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid worker.cleanup_cron '{schedule}': {e}"
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add notice_cleanup schedule: {e}")))?;

        tracing::info!(schedule, "Registered: notice_cleanup");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notice_core::error::ErrorKind;
    use notice_database::memory::MemoryStore;

    #[tokio::test]
    async fn test_invalid_cron_is_a_configuration_error() {
        let queue = Arc::new(JobQueue::new(Arc::new(MemoryStore::new()), 1));
        let scheduler = CronScheduler::new(queue).await.unwrap();
        let err = scheduler
            .register_notice_cleanup("every day please")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        scheduler.register_notice_cleanup("0 30 3 * * *").await.unwrap();
    }
}

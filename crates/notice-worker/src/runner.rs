//! Worker runner: main loop that polls for batches and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing;

use notice_core::config::WorkerConfig;
use notice_core::result::AppResult;
use notice_entity::batch::QueuedBatch;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::JobQueue;

/// How long shutdown waits for in-flight batches.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Main worker runner that polls the queue and executes batches
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
    /// Worker identifier
    worker_id: String,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        queue: Arc<JobQueue>,
        executor: Arc<JobExecutor>,
        config: WorkerConfig,
        worker_id: String,
    ) -> Self {
        Self {
            queue,
            executor,
            config,
            worker_id,
        }
    }

    /// Start the worker runner. Runs until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let concurrency = self.config.concurrency.max(1);
        tracing::info!(
            worker_id = %self.worker_id,
            concurrency,
            poll_interval = self.config.poll_interval_seconds,
            job_types = ?self.executor.registered_types(),
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds.max(1));

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!(worker_id = %self.worker_id, "Worker received shutdown signal");
                        break;
                    }
                }
                claimed = self.poll_and_spawn(&semaphore) => {
                    // Keep draining while batches are waiting.
                    if claimed {
                        continue;
                    }
                    tokio::select! {
                        _ = cancel.changed() => {
                            if *cancel.borrow() {
                                tracing::info!(worker_id = %self.worker_id, "Worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!(worker_id = %self.worker_id, "Waiting for in-flight batches");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        let _ = time::timeout(DRAIN_TIMEOUT, semaphore.acquire_many(permits)).await;
        tracing::info!(worker_id = %self.worker_id, "Worker shut down complete");
    }

    /// Claim and execute one batch inline. Returns whether a batch was
    /// processed.
    pub async fn process_next(&self) -> AppResult<bool> {
        match self.queue.dequeue().await? {
            Some(batch) => {
                process(&self.queue, &self.executor, batch).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Process batches until the queue is empty. Returns how many ran.
    pub async fn drain(&self) -> AppResult<usize> {
        let mut processed = 0;
        while self.process_next().await? {
            processed += 1;
        }
        Ok(processed)
    }

    /// Claim a batch when a slot is free and run it on its own task.
    async fn poll_and_spawn(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = Arc::clone(semaphore).acquire_owned().await else {
            return false;
        };

        match self.queue.dequeue().await {
            Ok(Some(batch)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);
                tokio::spawn(async move {
                    let _permit = permit;
                    process(&queue, &executor, batch).await;
                });
                true
            }
            Ok(None) => {
                tracing::trace!("No batches available");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to dequeue batch");
                false
            }
        }
    }
}

/// Execute a claimed batch and record the outcome.
async fn process(queue: &JobQueue, executor: &JobExecutor, batch: QueuedBatch) {
    let batch_id = batch.id;
    let outcome = match executor.execute(&batch).await {
        Ok(_) => {
            tracing::info!(batch_id = %batch_id, job_type = %batch.job_type, "Batch completed");
            queue.complete(batch_id).await
        }
        Err(JobExecutionError::Transient(msg)) if batch.can_retry() => {
            tracing::warn!(
                batch_id = %batch_id,
                attempt = batch.attempts,
                max_attempts = batch.max_attempts,
                error = %msg,
                "Batch failed, will retry"
            );
            queue.retry(batch_id, &msg).await
        }
        Err(e) => {
            let msg = e.to_string();
            tracing::error!(batch_id = %batch_id, error = %msg, "Batch failed");
            queue.fail(batch_id, &msg).await
        }
    };
    if let Err(e) = outcome {
        tracing::error!(batch_id = %batch_id, error = %e, "Failed to record batch outcome");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notice_database::memory::MemoryStore;
    use notice_database::store::QueueStore;
    use notice_entity::batch::BatchStatus;
    use serde_json::{Value, json};

    use crate::executor::JobHandler;

    #[derive(Debug)]
    struct Flaky;

    #[async_trait]
    impl JobHandler for Flaky {
        fn job_type(&self) -> &str {
            "flaky"
        }

        async fn execute(&self, _batch: &QueuedBatch) -> Result<Option<Value>, JobExecutionError> {
            Err(JobExecutionError::Transient("smtp timeout".into()))
        }
    }

    fn runner(store: &MemoryStore) -> (WorkerRunner, Arc<JobQueue>) {
        let queue = Arc::new(JobQueue::new(Arc::new(store.clone()), 2));
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(Flaky));
        let runner = WorkerRunner::new(
            Arc::clone(&queue),
            Arc::new(executor),
            WorkerConfig::default(),
            "test-worker".into(),
        );
        (runner, queue)
    }

    #[tokio::test]
    async fn test_transient_failure_retries_until_max_attempts() {
        let store = MemoryStore::new();
        let (runner, queue) = runner(&store);
        let batch = queue.enqueue("flaky", json!({})).await.unwrap();

        assert!(runner.process_next().await.unwrap());
        let after_first = store.find_by_id(batch.id).await.unwrap().unwrap();
        assert_eq!(after_first.status, BatchStatus::Pending);
        assert_eq!(after_first.error_message.as_deref(), Some("smtp timeout"));

        assert!(runner.process_next().await.unwrap());
        let after_second = store.find_by_id(batch.id).await.unwrap().unwrap();
        assert_eq!(after_second.status, BatchStatus::Failed);
        assert!(!runner.process_next().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_job_type_fails_immediately() {
        let store = MemoryStore::new();
        let (runner, queue) = runner(&store);
        let batch = queue.enqueue("mystery", json!({})).await.unwrap();

        assert_eq!(runner.drain().await.unwrap(), 1);
        let stored = store.find_by_id(batch.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BatchStatus::Failed);
        assert_eq!(stored.attempts, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let store = MemoryStore::new();
        let (runner, _) = runner(&store);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { runner.run(rx).await });
        tx.send(true).unwrap();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}

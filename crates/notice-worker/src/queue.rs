//! Job queue over the persistent batch store.

use std::sync::Arc;

use serde_json::Value;
use tracing;

use notice_core::result::AppResult;
use notice_core::types::id::BatchId;
use notice_database::store::{QueueStats, QueueStore};
use notice_entity::batch::{EnqueueBatch, QueuedBatch};

/// Job queue for enqueuing and claiming batches
#[derive(Debug, Clone)]
pub struct JobQueue {
    /// Batch persistence
    store: Arc<dyn QueueStore>,
    /// Attempts granted to newly enqueued batches
    max_attempts: i32,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(store: Arc<dyn QueueStore>, max_attempts: i32) -> Self {
        Self {
            store,
            max_attempts,
        }
    }

    /// Enqueue a new batch
    pub async fn enqueue(&self, job_type: &str, payload: Value) -> AppResult<QueuedBatch> {
        let batch = self
            .store
            .enqueue(EnqueueBatch {
                job_type: job_type.to_string(),
                payload,
                max_attempts: self.max_attempts,
            })
            .await?;
        tracing::debug!(batch_id = %batch.id, job_type = %batch.job_type, "Enqueued batch");
        Ok(batch)
    }

    /// Claim the oldest pending batch
    pub async fn dequeue(&self) -> AppResult<Option<QueuedBatch>> {
        let batch = self.store.claim_next().await?;
        if let Some(batch) = &batch {
            tracing::debug!(
                batch_id = %batch.id,
                job_type = %batch.job_type,
                attempt = batch.attempts,
                "Dequeued batch"
            );
        }
        Ok(batch)
    }

    /// Mark a batch as completed
    pub async fn complete(&self, id: BatchId) -> AppResult<()> {
        self.store.complete(id).await?;
        tracing::debug!(batch_id = %id, "Batch completed");
        Ok(())
    }

    /// Put a batch back to pending after a transient failure
    pub async fn retry(&self, id: BatchId, error: &str) -> AppResult<()> {
        self.store.fail(id, error, true).await?;
        tracing::debug!(batch_id = %id, error, "Batch returned to queue");
        Ok(())
    }

    /// Mark a batch as failed for good
    pub async fn fail(&self, id: BatchId, error: &str) -> AppResult<()> {
        self.store.fail(id, error, false).await?;
        tracing::debug!(batch_id = %id, error, "Batch failed");
        Ok(())
    }

    /// Batch counts by status
    pub async fn stats(&self) -> AppResult<QueueStats> {
        self.store.stats().await
    }
}

//! Queued batch entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notice_core::types::id::BatchId;

use super::status::BatchStatus;

/// A unit of deferred work picked up by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QueuedBatch {
    /// Unique identifier.
    pub id: BatchId,
    /// Job type, e.g. `"emit_notices"` or `"notice_cleanup"`.
    pub job_type: String,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Current status.
    pub status: BatchStatus,
    /// Number of attempts started so far.
    pub attempts: i32,
    /// Attempts allowed before the batch fails.
    pub max_attempts: i32,
    /// Last error, if any.
    pub error_message: Option<String>,
    /// When the batch was enqueued.
    pub created_at: DateTime<Utc>,
    /// When the batch last changed.
    pub updated_at: DateTime<Utc>,
}

impl QueuedBatch {
    /// Whether another attempt is allowed.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Data required to enqueue a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueBatch {
    /// Job type.
    pub job_type: String,
    /// Payload.
    pub payload: serde_json::Value,
    /// Maximum attempts.
    pub max_attempts: i32,
}

impl EnqueueBatch {
    /// Build the pending row.
    pub fn into_batch(self, now: DateTime<Utc>) -> QueuedBatch {
        QueuedBatch {
            id: BatchId::new(),
            job_type: self.job_type,
            payload: self.payload,
            status: BatchStatus::Pending,
            attempts: 0,
            max_attempts: self.max_attempts.max(1),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

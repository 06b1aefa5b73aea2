//! Job executor: dispatches batches to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use notice_core::error::AppError;
use notice_entity::batch::QueuedBatch;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the batch
    async fn execute(&self, batch: &QueuedBatch) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, never retried
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, retried while attempts remain
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Dispatches batches to the appropriate handler based on job_type
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a batch by dispatching to the correct handler
    pub async fn execute(&self, batch: &QueuedBatch) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&batch.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                batch.job_type
            ))
        })?;

        tracing::info!(
            batch_id = %batch.id,
            job_type = %batch.job_type,
            attempt = batch.attempts,
            max_attempts = batch.max_attempts,
            "Executing batch"
        );

        handler.execute(batch).await
    }

    /// Get the list of registered job types
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }
}

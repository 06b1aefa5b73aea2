//! Hands emit requests to the notification service according to the
//! configured dispatch mode.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use notice_core::config::DispatchMode;
use notice_core::result::AppResult;
use notice_core::types::id::BatchId;
use notice_database::store::QueueStore;
use notice_entity::batch::EnqueueBatch;

use crate::notification::{EmitRequest, NotificationService, SendReport};

/// Job type of queued emit requests.
pub const EMIT_NOTICES_JOB: &str = "emit_notices";

/// What happened to an emit request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Delivered before returning.
    Delivered(SendReport),
    /// Stored for the worker.
    Queued {
        /// The queued batch.
        batch_id: BatchId,
    },
    /// Running on a background task.
    Spawned,
}

/// Routes emit requests by dispatch mode.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: DispatchMode,
    notification: Arc<NotificationService>,
    queue: Arc<dyn QueueStore>,
    max_attempts: i32,
}

impl Dispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        mode: DispatchMode,
        notification: Arc<NotificationService>,
        queue: Arc<dyn QueueStore>,
        max_attempts: i32,
    ) -> Self {
        Self {
            mode,
            notification,
            queue,
            max_attempts,
        }
    }

    /// The configured mode.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Dispatch with the configured mode.
    pub async fn dispatch(&self, request: EmitRequest) -> AppResult<DispatchOutcome> {
        self.dispatch_with(self.mode, request).await
    }

    /// Dispatch with an explicit mode.
    pub async fn dispatch_with(
        &self,
        mode: DispatchMode,
        request: EmitRequest,
    ) -> AppResult<DispatchOutcome> {
        match mode {
            DispatchMode::Immediate => {
                let report = self.notification.emit(request).await?;
                Ok(DispatchOutcome::Delivered(report))
            }
            DispatchMode::Queued => {
                // Unknown labels would only fail later inside the worker.
                self.notification.notice_type(request.label()).await?;
                let batch = self
                    .queue
                    .enqueue(EnqueueBatch {
                        job_type: EMIT_NOTICES_JOB.to_string(),
                        payload: serde_json::to_value(&request)?,
                        max_attempts: self.max_attempts,
                    })
                    .await?;
                info!(batch_id = %batch.id, label = %request.label(), "Notices queued");
                Ok(DispatchOutcome::Queued { batch_id: batch.id })
            }
            DispatchMode::Threaded => {
                self.notification.notice_type(request.label()).await?;
                let notification = Arc::clone(&self.notification);
                tokio::spawn(async move {
                    let label = request.label().to_string();
                    match notification.emit(request).await {
                        Ok(report) => debug!(
                            label = %label,
                            delivered = report.delivered.len(),
                            "Background send finished"
                        ),
                        Err(e) => error!(label = %label, error = %e, "Background send failed"),
                    }
                });
                Ok(DispatchOutcome::Spawned)
            }
        }
    }
}

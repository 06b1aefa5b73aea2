//! Inbox cleanup: old archived notices and per-user caps.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing;

use notice_database::store::NoticeStore;
use notice_entity::batch::QueuedBatch;

use crate::executor::{JobExecutionError, JobHandler};

/// Job type of the cleanup batch.
pub const NOTICE_CLEANUP_JOB: &str = "notice_cleanup";

/// Removes archived notices past retention and trims oversized inboxes
#[derive(Debug)]
pub struct NoticeCleanupJobHandler {
    /// Notice store
    notices: Arc<dyn NoticeStore>,
    /// Archived notices older than this many days are deleted
    cleanup_after_days: u32,
    /// Notices kept per user
    max_stored_per_user: u64,
}

impl NoticeCleanupJobHandler {
    /// Create a new cleanup handler
    pub fn new(
        notices: Arc<dyn NoticeStore>,
        cleanup_after_days: u32,
        max_stored_per_user: u64,
    ) -> Self {
        Self {
            notices,
            cleanup_after_days,
            max_stored_per_user,
        }
    }
}

#[async_trait]
impl JobHandler for NoticeCleanupJobHandler {
    fn job_type(&self) -> &str {
        NOTICE_CLEANUP_JOB
    }

    async fn execute(&self, _batch: &QueuedBatch) -> Result<Option<Value>, JobExecutionError> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.cleanup_after_days));
        let archived = self
            .notices
            .delete_archived_before(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Archive cleanup failed: {e}")))?;

        let trimmed = self
            .notices
            .trim_per_user(self.max_stored_per_user)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Inbox trim failed: {e}")))?;

        tracing::info!(archived, trimmed, "Notice cleanup complete");

        Ok(Some(serde_json::json!({
            "task": NOTICE_CLEANUP_JOB,
            "archived_deleted": archived,
            "trimmed": trimmed,
        })))
    }
}

//! Batch queue repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notice_core::result::AppResult;
use notice_core::types::id::BatchId;
use notice_entity::batch::{EnqueueBatch, QueuedBatch};

use super::db_error;
use crate::store::{QueueStats, QueueStore};

/// Repository for queued batches.
#[derive(Debug, Clone)]
pub struct QueueRepository {
    pool: PgPool,
}

impl QueueRepository {
    /// Create a new queue repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for QueueRepository {
    async fn enqueue(&self, data: EnqueueBatch) -> AppResult<QueuedBatch> {
        let row = data.into_batch(chrono::Utc::now());
        sqlx::query_as::<_, QueuedBatch>(
            "INSERT INTO queued_batches (id, job_type, payload, status, attempts, max_attempts) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(row.id)
        .bind(&row.job_type)
        .bind(&row.payload)
        .bind(row.status)
        .bind(row.attempts)
        .bind(row.max_attempts)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to enqueue batch", e))
    }

    async fn claim_next(&self) -> AppResult<Option<QueuedBatch>> {
        sqlx::query_as::<_, QueuedBatch>(
            "UPDATE queued_batches SET status = 'running', attempts = attempts + 1, updated_at = NOW() \
             WHERE id = ( \
                SELECT id FROM queued_batches WHERE status = 'pending' \
                ORDER BY created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to claim batch", e))
    }

    async fn complete(&self, id: BatchId) -> AppResult<()> {
        sqlx::query(
            "UPDATE queued_batches SET status = 'completed', error_message = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to complete batch", e))?;
        Ok(())
    }

    async fn fail(&self, id: BatchId, error: &str, retry: bool) -> AppResult<()> {
        sqlx::query(
            "UPDATE queued_batches SET \
             status = CASE WHEN $3 THEN 'pending'::batch_status ELSE 'failed'::batch_status END, \
             error_message = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .bind(retry)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record batch failure", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: BatchId) -> AppResult<Option<QueuedBatch>> {
        sqlx::query_as::<_, QueuedBatch>("SELECT * FROM queued_batches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find batch", e))
    }

    async fn stats(&self) -> AppResult<QueueStats> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status::text, COUNT(*) FROM queued_batches GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load queue stats", e))?;

        let mut stats = QueueStats::default();
        for (status, count) in rows {
            let count = count.max(0) as u64;
            match status.as_str() {
                "pending" => stats.pending = count,
                "running" => stats.running = count,
                "completed" => stats.completed = count,
                "failed" => stats.failed = count,
                _ => {}
            }
        }
        Ok(stats)
    }
}

//! Website notice repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use notice_core::result::AppResult;
use notice_core::types::id::{NoticeId, UserId};
use notice_entity::notice::{CreateNotice, Notice};

use super::db_error;
use crate::store::NoticeStore;

/// Repository for website notices.
#[derive(Debug, Clone)]
pub struct NoticeRepository {
    pool: PgPool,
}

impl NoticeRepository {
    /// Create a new notice repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeStore for NoticeRepository {
    async fn insert(&self, data: CreateNotice) -> AppResult<Notice> {
        let row = data.into_notice(NoticeId::new(), Utc::now());
        sqlx::query_as::<_, Notice>(
            "INSERT INTO notices (id, recipient_id, notice_type_id, notice_type_label, message, \
             context, sender_content_type, sender_object_id, sender_path, unseen, archived, on_site, added) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(row.id)
        .bind(row.recipient_id)
        .bind(row.notice_type_id)
        .bind(&row.notice_type_label)
        .bind(&row.message)
        .bind(&row.context)
        .bind(&row.sender_content_type)
        .bind(&row.sender_object_id)
        .bind(&row.sender_path)
        .bind(row.unseen)
        .bind(row.archived)
        .bind(row.on_site)
        .bind(row.added)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to store notice", e))
    }

    async fn find_by_id(&self, id: NoticeId) -> AppResult<Option<Notice>> {
        sqlx::query_as::<_, Notice>("SELECT * FROM notices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find notice", e))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        include_archived: bool,
    ) -> AppResult<Vec<Notice>> {
        sqlx::query_as::<_, Notice>(
            "SELECT * FROM notices WHERE recipient_id = $1 AND ($2 OR NOT archived) \
             ORDER BY added DESC",
        )
        .bind(user_id)
        .bind(include_archived)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list notices", e))
    }

    async fn mark_seen(&self, id: NoticeId) -> AppResult<()> {
        sqlx::query("UPDATE notices SET unseen = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to mark notice seen", e))?;
        Ok(())
    }

    async fn mark_all_seen(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notices SET unseen = FALSE WHERE recipient_id = $1 AND unseen AND NOT archived",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark notices seen", e))?;
        Ok(result.rows_affected())
    }

    async fn archive(&self, id: NoticeId) -> AppResult<()> {
        sqlx::query("UPDATE notices SET archived = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to archive notice", e))?;
        Ok(())
    }

    async fn delete(&self, id: NoticeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete notice", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_unseen(&self, user_id: UserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notices WHERE recipient_id = $1 AND unseen AND NOT archived",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count unseen notices", e))?;
        Ok(count.max(0) as u64)
    }

    async fn delete_archived_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notices WHERE archived AND added < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete archived notices", e))?;
        Ok(result.rows_affected())
    }

    async fn trim_per_user(&self, max_per_user: u64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notices WHERE id IN ( \
                SELECT id FROM ( \
                    SELECT id, ROW_NUMBER() OVER (PARTITION BY recipient_id ORDER BY added DESC) AS rn \
                    FROM notices \
                ) ranked WHERE rn > $1 \
             )",
        )
        .bind(i64::try_from(max_per_user).unwrap_or(i64::MAX))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to trim notices", e))?;
        Ok(result.rows_affected())
    }
}

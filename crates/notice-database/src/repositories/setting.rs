//! Notice setting repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notice_core::result::AppResult;
use notice_core::types::id::{NoticeTypeId, UserId};
use notice_entity::setting::NoticeSetting;

use super::db_error;
use crate::store::SettingStore;

/// Repository for notice settings.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    /// Create a new setting repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingStore for SettingRepository {
    async fn get_or_create(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium: &str,
        default_send: bool,
    ) -> AppResult<NoticeSetting> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, NoticeSetting>(
            "INSERT INTO notice_settings (user_id, notice_type_id, medium, send) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, notice_type_id, medium) \
             DO UPDATE SET send = notice_settings.send \
             RETURNING *",
        )
        .bind(user_id)
        .bind(notice_type_id)
        .bind(medium)
        .bind(default_send)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load notice setting", e))
    }

    async fn set_send(
        &self,
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        medium: &str,
        send: bool,
    ) -> AppResult<NoticeSetting> {
        sqlx::query_as::<_, NoticeSetting>(
            "INSERT INTO notice_settings (user_id, notice_type_id, medium, send) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, notice_type_id, medium) DO UPDATE SET send = EXCLUDED.send \
             RETURNING *",
        )
        .bind(user_id)
        .bind(notice_type_id)
        .bind(medium)
        .bind(send)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save notice setting", e))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<NoticeSetting>> {
        sqlx::query_as::<_, NoticeSetting>("SELECT * FROM notice_settings WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list notice settings", e))
    }

    async fn disable_medium(&self, user_id: UserId, medium: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "INSERT INTO notice_settings (user_id, notice_type_id, medium, send) \
             SELECT $1, id, $2, FALSE FROM notice_types \
             ON CONFLICT (user_id, notice_type_id, medium) DO UPDATE SET send = FALSE",
        )
        .bind(user_id)
        .bind(medium)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to disable medium", e))?;
        Ok(result.rows_affected())
    }
}

//! Notice type repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_core::types::id::NoticeTypeId;
use notice_entity::notice_type::{CreateNoticeType, NoticeType};

use super::db_error;
use crate::store::NoticeTypeStore;

/// Repository for notice types.
#[derive(Debug, Clone)]
pub struct NoticeTypeRepository {
    pool: PgPool,
}

impl NoticeTypeRepository {
    /// Create a new notice type repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeTypeStore for NoticeTypeRepository {
    async fn find_by_label(&self, label: &str) -> AppResult<Option<NoticeType>> {
        sqlx::query_as::<_, NoticeType>("SELECT * FROM notice_types WHERE label = $1")
            .bind(label)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find notice type", e))
    }

    async fn list(&self) -> AppResult<Vec<NoticeType>> {
        sqlx::query_as::<_, NoticeType>("SELECT * FROM notice_types ORDER BY label")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list notice types", e))
    }

    async fn insert(&self, data: &CreateNoticeType) -> AppResult<NoticeType> {
        sqlx::query_as::<_, NoticeType>(
            "INSERT INTO notice_types (id, label, display, description, default_sensitivity) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(NoticeTypeId::new())
        .bind(&data.label)
        .bind(&data.display)
        .bind(&data.description)
        .bind(data.default_sensitivity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create notice type", e))
    }

    async fn update(&self, id: NoticeTypeId, data: &CreateNoticeType) -> AppResult<NoticeType> {
        sqlx::query_as::<_, NoticeType>(
            "UPDATE notice_types SET display = $2, description = $3, default_sensitivity = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.display)
        .bind(&data.description)
        .bind(data.default_sensitivity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update notice type", e))?
        .ok_or_else(|| AppError::not_found(format!("Notice type {id} not found")))
    }
}

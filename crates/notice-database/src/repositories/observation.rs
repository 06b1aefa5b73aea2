//! Observation repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notice_core::result::AppResult;
use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;
use notice_entity::observation::Observation;

use super::db_error;
use crate::store::ObservationStore;

/// Repository for observations.
#[derive(Debug, Clone)]
pub struct ObservationRepository {
    pool: PgPool,
}

impl ObservationRepository {
    /// Create a new observation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationStore for ObservationRepository {
    async fn insert_if_absent(&self, observation: Observation) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO observations (id, user_id, notice_type_id, notice_type_label, content_type, \
             object_id, send, added) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (user_id, notice_type_id, content_type, object_id) DO NOTHING",
        )
        .bind(observation.id)
        .bind(observation.user_id)
        .bind(observation.notice_type_id)
        .bind(&observation.notice_type_label)
        .bind(&observation.content_type)
        .bind(&observation.object_id)
        .bind(observation.send)
        .bind(observation.added)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create observation", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(
        &self,
        user_id: UserId,
        label: &str,
        observed: &ObjectRef,
    ) -> AppResult<Option<Observation>> {
        sqlx::query_as::<_, Observation>(
            "SELECT * FROM observations WHERE user_id = $1 AND notice_type_label = $2 \
             AND content_type = $3 AND object_id = $4",
        )
        .bind(user_id)
        .bind(label)
        .bind(&observed.content_type)
        .bind(&observed.object_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find observation", e))
    }

    async fn delete(&self, user_id: UserId, label: &str, observed: &ObjectRef) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM observations WHERE user_id = $1 AND notice_type_label = $2 \
             AND content_type = $3 AND object_id = $4",
        )
        .bind(user_id)
        .bind(label)
        .bind(&observed.content_type)
        .bind(&observed.object_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete observation", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn observers(&self, observed: &ObjectRef, label: &str) -> AppResult<Vec<Observation>> {
        sqlx::query_as::<_, Observation>(
            "SELECT * FROM observations WHERE content_type = $1 AND object_id = $2 \
             AND notice_type_label = $3 ORDER BY added DESC",
        )
        .bind(&observed.content_type)
        .bind(&observed.object_id)
        .bind(label)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list observers", e))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        content_type: &str,
        labels: &[String],
    ) -> AppResult<Vec<Observation>> {
        sqlx::query_as::<_, Observation>(
            "SELECT * FROM observations WHERE user_id = $1 AND content_type = $2 \
             AND notice_type_label = ANY($3) ORDER BY added DESC",
        )
        .bind(user_id)
        .bind(content_type)
        .bind(labels)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list observations", e))
    }

    async fn delete_for_object(&self, observed: &ObjectRef) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM observations WHERE content_type = $1 AND object_id = $2")
                .bind(&observed.content_type)
                .bind(&observed.object_id)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to delete observations", e))?;
        Ok(result.rows_affected())
    }
}

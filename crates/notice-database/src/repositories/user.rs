//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use notice_core::result::AppResult;
use notice_core::types::id::UserId;
use notice_entity::user::{UpsertUser, User};

use super::db_error;
use crate::store::UserStore;

/// Repository for mirrored users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn upsert(&self, data: UpsertUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, language, is_active, is_superuser) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, email = EXCLUDED.email, \
             language = EXCLUDED.language, is_active = EXCLUDED.is_active, \
             is_superuser = EXCLUDED.is_superuser \
             RETURNING *",
        )
        .bind(data.id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.language)
        .bind(data.is_active)
        .bind(data.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to upsert user", e))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user", e))
    }

    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1) ORDER BY username")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find users", e))
    }

    async fn list_active(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE is_active ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))
    }
}

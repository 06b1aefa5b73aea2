//! User mirroring.

use std::sync::Arc;

use tracing::debug;

use notice_core::error::AppError;
use notice_core::result::AppResult;
use notice_core::types::id::UserId;
use notice_database::store::UserStore;
use notice_entity::user::{UpsertUser, User};

/// Keeps the local copy of host users current.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Insert or refresh a user pushed by the host.
    pub async fn upsert(&self, mut data: UpsertUser) -> AppResult<User> {
        data.username = data.username.trim().to_string();
        if data.username.is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }
        data.email = data
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if let Some(email) = &data.email {
            if !email.contains('@') {
                return Err(AppError::validation(format!("Invalid email '{email}'")));
            }
        }
        let user = self.users.upsert(data).await?;
        debug!(user_id = %user.id, "Mirrored user");
        Ok(user)
    }

    /// Look up a user.
    pub async fn get(&self, id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

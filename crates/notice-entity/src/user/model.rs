//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notice_core::types::id::UserId;

/// A user mirrored from the host application.
///
/// Notice does not own accounts. The host pushes its users through the
/// service API so recipients can be resolved by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Host-assigned identifier.
    pub id: UserId,
    /// Login name, used in templates.
    pub username: String,
    /// Email address, if the user has one.
    pub email: Option<String>,
    /// Preferred notification language (e.g. `"de"`).
    pub language: Option<String>,
    /// Inactive users never receive notices.
    pub is_active: bool,
    /// Superusers may archive and delete anyone's notices.
    pub is_superuser: bool,
    /// When the user was first mirrored.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user has a non-empty email address.
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// Data pushed by the host to create or refresh a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUser {
    /// Host-assigned identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: Option<String>,
    /// Preferred language.
    pub language: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Superuser flag.
    pub is_superuser: bool,
}

impl UpsertUser {
    /// Materialize a user row, keeping `created_at` from an existing row.
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            language: self.language,
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            created_at,
        }
    }
}

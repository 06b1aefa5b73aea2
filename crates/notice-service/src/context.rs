//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notice_core::types::id::UserId;

/// The user on whose behalf an inbox operation runs.
///
/// Built from the host-issued access token and passed into service methods
/// so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Whether the host marked the user as a superuser.
    pub is_superuser: bool,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, is_superuser: bool) -> Self {
        Self {
            user_id,
            is_superuser,
            request_time: Utc::now(),
        }
    }

    /// Whether this user may manage a notice received by `recipient`.
    pub fn can_manage(&self, recipient: UserId) -> bool {
        self.user_id == recipient || self.is_superuser
    }
}

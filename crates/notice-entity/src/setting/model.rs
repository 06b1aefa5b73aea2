//! Notice setting entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notice_core::types::id::{NoticeTypeId, UserId};

/// Whether a user receives notices of one type through one medium.
///
/// Unique on `(user_id, notice_type_id, medium)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NoticeSetting {
    /// The user.
    pub user_id: UserId,
    /// The notice type.
    pub notice_type_id: NoticeTypeId,
    /// Medium id (single character).
    pub medium: String,
    /// Whether to send.
    pub send: bool,
}

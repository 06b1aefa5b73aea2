//! Response DTOs.

use serde::{Deserialize, Serialize};

use notice_entity::notice::Notice;
use notice_entity::notice_type::NoticeType;
use notice_service::notice_type::TypeChange;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store status.
    pub database: String,
}

/// A single count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// The count.
    pub count: u64,
}

/// Result of registering a notice type.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeTypeResponse {
    /// The stored type.
    pub notice_type: NoticeType,
    /// What happened.
    pub change: TypeChange,
}

/// Notices of the inbox view.
#[derive(Debug, Clone, Serialize)]
pub struct InboxResponse {
    /// Notices, newest first.
    pub notices: Vec<Notice>,
    /// Whether archived notices are included.
    pub all: bool,
    /// Month of the request, e.g. `October 2026`.
    pub this_month: String,
    /// Unseen notices of the user.
    pub unseen: u64,
}

/// Whether a user observes an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservingResponse {
    /// The answer.
    pub observing: bool,
}

/// Number of rows an operation touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedResponse {
    /// Rows created, removed or updated.
    pub changed: u64,
}

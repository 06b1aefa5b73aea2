//! JWT claim structures.

use serde::{Deserialize, Serialize};

use notice_core::types::id::UserId;

/// Claims of an access token issued by the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Superuser flag.
    #[serde(default)]
    pub su: bool,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Purpose claim carried by unsubscribe codes.
pub const UNSUBSCRIBE_PURPOSE: &str = "unsubscribe";

/// Claims of an unsubscribe code. Codes do not expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeClaims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Always [`UNSUBSCRIBE_PURPOSE`].
    pub purpose: String,
}

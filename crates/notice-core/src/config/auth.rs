//! Authentication and signing configuration.

use serde::{Deserialize, Serialize};

/// Secrets shared with the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to verify user bearer tokens issued by the host app.
    #[serde(default = "default_secret")]
    pub jwt_secret: String,
    /// Accepted clock skew for bearer token expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// HMAC secret used to sign unsubscribe links.
    #[serde(default = "default_secret")]
    pub signing_secret: String,
    /// Key expected in the `x-api-key` header of service API calls.
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_secret(),
            jwt_leeway_seconds: default_leeway(),
            signing_secret: default_secret(),
            api_key: default_api_key(),
        }
    }
}

fn default_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_api_key() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

//! Caller identification: bearer tokens for users, an API key for the host.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use notice_core::error::AppError;
use notice_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the service API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let ctx = state.token_decoder.decode(token)?;
        Ok(AuthUser(ctx))
    }
}

/// Marker for requests made by the host application with the API key.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey;

impl FromRequestParts<AppState> for ServiceKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing x-api-key header"))?;

        if !constant_time_eq(key.as_bytes(), state.config.auth.api_key.as_bytes()) {
            return Err(AppError::authentication("Invalid API key").into());
        }
        Ok(ServiceKey)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! User mirroring handlers for the host application.

use axum::Json;
use axum::extract::{Path, State};

use notice_core::types::id::UserId;
use notice_entity::user::User;

use crate::dto::request::UpsertUserRequest;
use crate::dto::response::ApiResponse;
use crate::dto::validate_body;
use crate::error::ApiResult;
use crate::extractors::ServiceKey;
use crate::state::AppState;

/// PUT /api/users
pub async fn upsert_user(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<UpsertUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    validate_body(&req)?;
    let user = state.user_service.upsert(req.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _key: ServiceKey,
    Path(id): Path<UserId>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.user_service.get(id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

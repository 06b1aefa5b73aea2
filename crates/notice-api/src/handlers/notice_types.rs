//! Notice type registration handlers.

use axum::Json;
use axum::extract::State;

use notice_entity::notice_type::NoticeType;

use crate::dto::request::CreateNoticeTypeRequest;
use crate::dto::response::{ApiResponse, NoticeTypeResponse};
use crate::dto::validate_body;
use crate::error::ApiResult;
use crate::extractors::ServiceKey;
use crate::state::AppState;

/// GET /api/notice-types
pub async fn list_notice_types(
    State(state): State<AppState>,
    _key: ServiceKey,
) -> ApiResult<Json<ApiResponse<Vec<NoticeType>>>> {
    let types = state.notice_type_service.list().await?;
    Ok(Json(ApiResponse::ok(types)))
}

/// POST /api/notice-types
///
/// Creates the type or updates the one with the same label.
pub async fn create_notice_type(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<CreateNoticeTypeRequest>,
) -> ApiResult<Json<ApiResponse<NoticeTypeResponse>>> {
    validate_body(&req)?;
    let (notice_type, change) = state
        .notice_type_service
        .create_notice_type(req.into())
        .await?;
    Ok(Json(ApiResponse::ok(NoticeTypeResponse {
        notice_type,
        change,
    })))
}

//! One-click unsubscribe handler.

use axum::Json;
use axum::extract::{Path, State};

use notice_service::UnsubscribeOutcome;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /notices/unsubscribe/{medium}/{code}
///
/// Needs no login; the signed code identifies the user.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path((medium, code)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<UnsubscribeOutcome>>> {
    let outcome = state.unsubscribe_service.unsubscribe(&medium, &code).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

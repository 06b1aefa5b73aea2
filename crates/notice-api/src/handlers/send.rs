//! Send and broadcast handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use notice_core::config::DispatchMode;
use notice_service::{DispatchOutcome, EmitRequest};

use crate::dto::request::{BroadcastNoticeRequest, SendNoticeRequest};
use crate::dto::response::ApiResponse;
use crate::dto::validate_body;
use crate::error::ApiResult;
use crate::extractors::ServiceKey;
use crate::state::AppState;

type DispatchResponse = (StatusCode, Json<ApiResponse<DispatchOutcome>>);

/// POST /api/send
pub async fn send(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<SendNoticeRequest>,
) -> ApiResult<DispatchResponse> {
    validate_body(&req)?;
    let (request, mode) = req.into_parts()?;
    dispatch(&state, mode, EmitRequest::Send(request)).await
}

/// POST /api/broadcast
pub async fn broadcast(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<BroadcastNoticeRequest>,
) -> ApiResult<DispatchResponse> {
    validate_body(&req)?;
    let (request, mode) = req.into_parts()?;
    dispatch(&state, mode, EmitRequest::Broadcast(request)).await
}

async fn dispatch(
    state: &AppState,
    mode: Option<DispatchMode>,
    request: EmitRequest,
) -> ApiResult<DispatchResponse> {
    let mode = mode.unwrap_or_else(|| state.dispatcher.mode());
    let outcome = state.dispatcher.dispatch_with(mode, request).await?;
    Ok((status_for(&outcome), Json(ApiResponse::ok(outcome))))
}

/// 200 when delivered inline, 202 when handed off.
fn status_for(outcome: &DispatchOutcome) -> StatusCode {
    match outcome {
        DispatchOutcome::Delivered(_) => StatusCode::OK,
        DispatchOutcome::Queued { .. } | DispatchOutcome::Spawned => StatusCode::ACCEPTED,
    }
}

//! Observation handlers for the host application.

use axum::Json;
use axum::extract::{Path, Query, State};

use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;
use notice_service::{DispatchOutcome, ObservationNotice};

use crate::dto::request::{
    LabelsQuery, NotifyObserversRequest, ObservationCheckQuery, ObservationRequest, split_labels,
};
use crate::dto::response::{ApiResponse, ChangedResponse, ObservingResponse};
use crate::dto::validate_body;
use crate::error::ApiResult;
use crate::extractors::ServiceKey;
use crate::state::AppState;

/// POST /api/observations
pub async fn observe(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<ObservationRequest>,
) -> ApiResult<Json<ApiResponse<ChangedResponse>>> {
    validate_body(&req)?;
    let observed = req.observed()?;
    let created = state
        .observation_service
        .observe(&observed, req.user_id, &req.labels)
        .await?;
    Ok(Json(ApiResponse::ok(ChangedResponse {
        changed: created as u64,
    })))
}

/// DELETE /api/observations
pub async fn stop_observing(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<ObservationRequest>,
) -> ApiResult<Json<ApiResponse<ChangedResponse>>> {
    validate_body(&req)?;
    let observed = req.observed()?;
    let removed = state
        .observation_service
        .stop_observing(&observed, req.user_id, &req.labels)
        .await?;
    Ok(Json(ApiResponse::ok(ChangedResponse {
        changed: removed as u64,
    })))
}

/// GET /api/observations/check
pub async fn is_observing(
    State(state): State<AppState>,
    _key: ServiceKey,
    Query(query): Query<ObservationCheckQuery>,
) -> ApiResult<Json<ApiResponse<ObservingResponse>>> {
    let observed = query.observed()?;
    let observing = state
        .observation_service
        .is_observing(&observed, query.user_id, &split_labels(&query.labels))
        .await?;
    Ok(Json(ApiResponse::ok(ObservingResponse { observing })))
}

/// GET /api/observations/{user_id}/{content_type}
///
/// Distinct objects of one content type the user observes.
pub async fn list_observed(
    State(state): State<AppState>,
    _key: ServiceKey,
    Path((user_id, content_type)): Path<(UserId, String)>,
    Query(query): Query<LabelsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ObjectRef>>>> {
    let objects = state
        .observation_service
        .get_observations(Some(user_id), &content_type, &split_labels(&query.labels))
        .await?;
    Ok(Json(ApiResponse::ok(objects)))
}

/// POST /api/observations/notify
pub async fn notify_observers(
    State(state): State<AppState>,
    _key: ServiceKey,
    Json(req): Json<NotifyObserversRequest>,
) -> ApiResult<Json<ApiResponse<Vec<DispatchOutcome>>>> {
    let notice = ObservationNotice::try_from(req)?;
    let outcomes = state
        .observation_service
        .send_observation_notices_for(notice)
        .await?;
    Ok(Json(ApiResponse::ok(outcomes)))
}

/// DELETE /api/objects/{content_type}/{object_id}
///
/// Called by the host when an observed object is deleted.
pub async fn forget_object(
    State(state): State<AppState>,
    _key: ServiceKey,
    Path((content_type, object_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<ChangedResponse>>> {
    let observed = ObjectRef::new(content_type, object_id)?;
    let removed = state.observation_service.forget_object(&observed).await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed: removed })))
}

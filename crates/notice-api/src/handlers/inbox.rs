//! Website inbox handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;

use notice_core::types::PageResponse;
use notice_core::types::id::NoticeId;
use notice_entity::notice::Notice;

use crate::dto::request::{NextPageQuery, SingleQuery, ViewSenderQuery};
use crate::dto::response::{ApiResponse, CountResponse, InboxResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::handlers::redirect_to;
use crate::state::AppState;

const INBOX_PATH: &str = "/notices";

/// GET /notices
pub async fn list_notices(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<InboxResponse>>> {
    let list = state.inbox_service.notices(&auth, false).await?;
    let unseen = state.inbox_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(InboxResponse {
        notices: list.notices,
        all: list.all,
        this_month: list.this_month,
        unseen,
    })))
}

/// GET /notices/all
///
/// Every non-archived notice, without the latest-only filter, paginated.
pub async fn list_all_notices(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Notice>>>> {
    let page = params.into_page_request();
    let list = state.inbox_service.notices(&auth, true).await?;
    let total = list.notices.len() as u64;
    let items: Vec<Notice> = list
        .notices
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Ok(Json(ApiResponse::ok(PageResponse::new(
        items,
        page.page,
        page.page_size,
        total,
    ))))
}

/// GET /notices/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.inbox_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /notices/{id}
pub async fn get_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoticeId>,
    Query(query): Query<SingleQuery>,
) -> ApiResult<Json<ApiResponse<Notice>>> {
    let notice = state
        .inbox_service
        .single(&auth, id, query.mark_seen)
        .await?;
    Ok(Json(ApiResponse::ok(notice)))
}

/// GET /notices/view/{id}
pub async fn view_sender(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoticeId>,
    Query(query): Query<ViewSenderQuery>,
) -> ApiResult<Redirect> {
    let target = state
        .inbox_service
        .view_sender(&auth, id, query.sender_url.as_deref())
        .await?;
    Ok(Redirect::to(&target))
}

/// POST /notices/{id}/archive
pub async fn archive_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoticeId>,
    Query(query): Query<NextPageQuery>,
) -> ApiResult<Redirect> {
    state.inbox_service.archive(&auth, id).await?;
    Ok(redirect_to(query.next_page.as_deref(), INBOX_PATH))
}

/// POST /notices/{id}/delete
pub async fn delete_notice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoticeId>,
    Query(query): Query<NextPageQuery>,
) -> ApiResult<Redirect> {
    state.inbox_service.delete(&auth, id).await?;
    Ok(redirect_to(query.next_page.as_deref(), INBOX_PATH))
}

/// POST /notices/mark_all_seen
pub async fn mark_all_seen(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Redirect> {
    state.inbox_service.mark_all_seen(&auth).await?;
    Ok(Redirect::to(INBOX_PATH))
}

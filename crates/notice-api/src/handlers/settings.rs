//! Notification settings handlers.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::Redirect;
use axum::{Form, Json};

use notice_service::settings::SettingsTable;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::redirect_to;
use crate::state::AppState;

const SETTINGS_PATH: &str = "/notices/settings";

/// GET /notices/settings
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<SettingsTable>>> {
    let table = state.settings_service.settings_table(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(table)))
}

/// POST /notices/settings
///
/// Form fields are `<label>_<medium id>` set to `on`; an optional
/// `next_page` field picks the redirect target.
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<HashMap<String, String>>,
) -> ApiResult<Redirect> {
    state
        .settings_service
        .apply_settings_form(auth.user_id, &form)
        .await?;
    let next_page = form.get("next_page").map(String::as_str);
    Ok(redirect_to(next_page, SETTINGS_PATH))
}

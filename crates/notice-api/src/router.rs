//! Route definitions for the Notice HTTP API.
//!
//! User-facing views live under `/notices` and authenticate with a bearer
//! token. The host application calls the service API under `/api` with the
//! shared API key.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/notices", notice_routes())
        .nest("/api", service_routes())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Inbox, settings and unsubscribe views.
fn notice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::inbox::list_notices))
        .route("/all", get(handlers::inbox::list_all_notices))
        .route("/unread-count", get(handlers::inbox::unread_count))
        .route("/mark_all_seen", post(handlers::inbox::mark_all_seen))
        .route(
            "/settings",
            get(handlers::settings::get_settings).post(handlers::settings::update_settings),
        )
        .route("/view/{id}", get(handlers::inbox::view_sender))
        .route(
            "/unsubscribe/{medium}/{code}",
            get(handlers::unsubscribe::unsubscribe),
        )
        .route("/{id}", get(handlers::inbox::get_notice))
        .route("/{id}/archive", post(handlers::inbox::archive_notice))
        .route("/{id}/delete", post(handlers::inbox::delete_notice))
}

/// Service API for the host application.
fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/users", put(handlers::users::upsert_user))
        .route("/users/{id}", get(handlers::users::get_user))
        .route(
            "/notice-types",
            get(handlers::notice_types::list_notice_types)
                .post(handlers::notice_types::create_notice_type),
        )
        .route("/send", post(handlers::send::send))
        .route("/broadcast", post(handlers::send::broadcast))
        .route(
            "/observations",
            post(handlers::observations::observe).delete(handlers::observations::stop_observing),
        )
        .route("/observations/check", get(handlers::observations::is_observing))
        .route("/observations/notify", post(handlers::observations::notify_observers))
        .route(
            "/observations/{user_id}/{content_type}",
            get(handlers::observations::list_observed),
        )
        .route(
            "/objects/{content_type}/{object_id}",
            delete(handlers::observations::forget_object),
        )
}

//! # notice-api
//!
//! HTTP API layer for Notice built on Axum.
//!
//! Serves the user-facing notice views (inbox, settings, unsubscribe) and
//! the service-to-service API the host application calls to register
//! types, mirror users, send notices and manage observations.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_worker, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

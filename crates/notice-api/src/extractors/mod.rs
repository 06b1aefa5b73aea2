//! Custom Axum extractors.

pub mod auth;
pub mod pagination;

pub use auth::{AuthUser, ServiceKey};
pub use pagination::PaginationParams;

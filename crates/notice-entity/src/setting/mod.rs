//! Per-user notice settings.

pub mod model;

pub use model::NoticeSetting;

//! Mirrored users and their notification language.

pub mod language;
pub mod service;

pub use language::notification_language;
pub use service::UserService;

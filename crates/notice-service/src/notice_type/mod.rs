//! Notice type registration.

pub mod service;

pub use service::{NoticeTypeService, TypeChange};

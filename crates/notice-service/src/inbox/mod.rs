//! The website inbox of a user.

pub mod service;

pub use service::{InboxService, NoticeList, is_local_path};

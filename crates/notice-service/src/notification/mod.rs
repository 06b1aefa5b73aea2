//! Sending notices to users.

pub mod request;
pub mod sender;
pub mod service;

pub use request::{BroadcastRequest, EmitRequest, SendRequest};
pub use sender::sender_path;
pub use service::{DeliveredTo, FailedDelivery, NotificationService, SendReport};

//! # notice-service
//!
//! Business logic for Notice. Each service orchestrates the stores and the
//! delivery backends to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod auth;
pub mod context;
pub mod dispatch;
pub mod inbox;
pub mod notice_type;
pub mod notification;
pub mod observation;
pub mod settings;
pub mod unsubscribe;
pub mod user;

#[cfg(test)]
mod testing;

pub use auth::{AccessTokenDecoder, UnsubscribeSigner};
pub use context::RequestContext;
pub use dispatch::{DispatchOutcome, Dispatcher, EMIT_NOTICES_JOB};
pub use inbox::{InboxService, NoticeList, is_local_path};
pub use notice_type::NoticeTypeService;
pub use notification::{
    BroadcastRequest, EmitRequest, NotificationService, SendReport, SendRequest,
};
pub use observation::{ObservationNotice, ObservationService};
pub use settings::SettingsService;
pub use unsubscribe::{UnsubscribeOutcome, UnsubscribeService};
pub use user::UserService;

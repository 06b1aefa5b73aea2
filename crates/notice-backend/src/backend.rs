//! The delivery backend trait and the values passed through it.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use notice_core::result::AppResult;
use notice_core::types::ObjectRef;
use notice_entity::medium::Medium;
use notice_entity::notice::Notice;
use notice_entity::notice_type::NoticeType;
use notice_entity::user::User;

/// Label of the website inbox backend.
pub const WEBSITE: &str = "website";
/// Label of the email backend.
pub const EMAIL: &str = "email";

/// One notice on its way to one user.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The recipient.
    pub recipient: User,
    /// Type of the notice.
    pub notice_type: NoticeType,
    /// Object the notice is about.
    pub sender: Option<ObjectRef>,
    /// Path of the sender on the host site.
    pub sender_path: Option<String>,
    /// Language to render templates in.
    pub language: String,
    /// Template context.
    pub context: Map<String, Value>,
}

/// What a backend did with a delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryReceipt {
    /// Stored in the website inbox.
    Stored {
        /// The stored notice.
        notice: Box<Notice>,
    },
    /// Handed to a mail transport.
    Emailed {
        /// Recipient address.
        to: String,
        /// Transport reference, when the transport reports one.
        reference: Option<String>,
    },
}

impl DeliveryReceipt {
    /// The stored notice, for website receipts.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Stored { notice } => Some(notice),
            Self::Emailed { .. } => None,
        }
    }
}

/// A delivery medium.
#[async_trait]
pub trait DeliveryBackend: Send + Sync + Debug {
    /// The medium this backend serves.
    fn medium(&self) -> &Medium;

    /// Whether the user can structurally receive through this medium.
    /// User settings are checked by the caller.
    fn accepts(&self, user: &User) -> bool;

    /// Deliver one notice.
    async fn deliver(&self, delivery: &Delivery) -> AppResult<DeliveryReceipt>;
}

//! Website notice entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notice_core::types::ObjectRef;
use notice_core::types::id::{NoticeId, NoticeTypeId, UserId};

/// A notice stored in a user's website inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notice {
    /// Unique identifier.
    pub id: NoticeId,
    /// The user who received the notice.
    pub recipient_id: UserId,
    /// Type of the notice.
    pub notice_type_id: NoticeTypeId,
    /// Label of the type, denormalized for listing.
    pub notice_type_label: String,
    /// Rendered message.
    pub message: String,
    /// The context the message was rendered with.
    pub context: serde_json::Value,
    /// Content type of the sender object, if any.
    pub sender_content_type: Option<String>,
    /// Id of the sender object, if any.
    pub sender_object_id: Option<String>,
    /// Path of the sender object on the host site.
    pub sender_path: Option<String>,
    /// Not yet seen by the recipient.
    pub unseen: bool,
    /// Hidden from the inbox.
    pub archived: bool,
    /// Shown on site.
    pub on_site: bool,
    /// When the notice was stored.
    pub added: DateTime<Utc>,
}

impl Notice {
    /// The sender object, when both columns are present.
    pub fn sender(&self) -> Option<ObjectRef> {
        match (&self.sender_content_type, &self.sender_object_id) {
            (Some(content_type), Some(object_id)) => Some(ObjectRef {
                content_type: content_type.clone(),
                object_id: object_id.clone(),
            }),
            _ => None,
        }
    }

    /// Local path of the view that marks this notice seen and redirects
    /// to the sender.
    pub fn view_sender_path(&self) -> String {
        format!("/notices/view/{}", self.id)
    }

    /// Notice fields merged into delivery contexts of other backends.
    pub fn context_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        fields.insert("notice_id".into(), self.id.to_string().into());
        fields.insert("unseen".into(), self.unseen.into());
        fields.insert("added".into(), self.added.to_rfc3339().into());
        fields
    }
}

/// Data required to store a website notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNotice {
    /// Recipient.
    pub recipient_id: UserId,
    /// Notice type id.
    pub notice_type_id: NoticeTypeId,
    /// Notice type label.
    pub notice_type_label: String,
    /// Rendered message.
    pub message: String,
    /// Render context.
    pub context: serde_json::Value,
    /// Sender object.
    pub sender: Option<ObjectRef>,
    /// Sender path.
    pub sender_path: Option<String>,
    /// Shown on site.
    pub on_site: bool,
}

impl CreateNotice {
    /// Build the stored row.
    pub fn into_notice(self, id: NoticeId, added: DateTime<Utc>) -> Notice {
        let (sender_content_type, sender_object_id) = match self.sender {
            Some(sender) => (Some(sender.content_type), Some(sender.object_id)),
            None => (None, None),
        };
        Notice {
            id,
            recipient_id: self.recipient_id,
            notice_type_id: self.notice_type_id,
            notice_type_label: self.notice_type_label,
            message: self.message,
            context: self.context,
            sender_content_type,
            sender_object_id,
            sender_path: self.sender_path.filter(|p| !p.is_empty()),
            unseen: true,
            archived: false,
            on_site: self.on_site,
            added,
        }
    }
}

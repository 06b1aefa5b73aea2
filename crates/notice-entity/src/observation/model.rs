//! Observation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notice_core::types::ObjectRef;
use notice_core::types::id::{NoticeTypeId, ObservationId, UserId};

/// A user watching a host object for notices of one type.
///
/// Unique on `(user_id, notice_type_id, content_type, object_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Observation {
    /// Unique identifier.
    pub id: ObservationId,
    /// The observer.
    pub user_id: UserId,
    /// Notice type observed.
    pub notice_type_id: NoticeTypeId,
    /// Label of the notice type.
    pub notice_type_label: String,
    /// Content type of the observed object.
    pub content_type: String,
    /// Id of the observed object.
    pub object_id: String,
    /// Whether notices are sent for this observation.
    pub send: bool,
    /// When the observation was created.
    pub added: DateTime<Utc>,
}

impl Observation {
    /// Start a new observation.
    pub fn new(
        user_id: UserId,
        notice_type_id: NoticeTypeId,
        notice_type_label: impl Into<String>,
        observed: &ObjectRef,
    ) -> Self {
        Self {
            id: ObservationId::new(),
            user_id,
            notice_type_id,
            notice_type_label: notice_type_label.into(),
            content_type: observed.content_type.clone(),
            object_id: observed.object_id.clone(),
            send: true,
            added: Utc::now(),
        }
    }

    /// The observed object.
    pub fn observed(&self) -> ObjectRef {
        ObjectRef {
            content_type: self.content_type.clone(),
            object_id: self.object_id.clone(),
        }
    }

    /// Whether this observation is about the given object.
    pub fn is_for(&self, observed: &ObjectRef) -> bool {
        self.content_type == observed.content_type && self.object_id == observed.object_id
    }
}

//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use notice_core::config::DispatchMode;
use notice_core::error::AppError;
use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;
use notice_entity::notice_type::CreateNoticeType;
use notice_entity::user::UpsertUser;
use notice_service::{BroadcastRequest, ObservationNotice, SendRequest};

/// Mirror a host user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertUserRequest {
    /// Host user id.
    pub id: UserId,
    /// Login name.
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,
    /// Email address.
    #[validate(email)]
    pub email: Option<String>,
    /// Preferred language.
    #[validate(length(min = 2, max = 10))]
    pub language: Option<String>,
    /// Active flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Superuser flag.
    #[serde(default)]
    pub is_superuser: bool,
}

impl From<UpsertUserRequest> for UpsertUser {
    fn from(req: UpsertUserRequest) -> Self {
        Self {
            id: req.id,
            username: req.username,
            email: req.email,
            language: req.language,
            is_active: req.is_active,
            is_superuser: req.is_superuser,
        }
    }
}

/// Register or update a notice type.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNoticeTypeRequest {
    /// Unique label.
    #[validate(length(min = 1, max = 40))]
    pub label: String,
    /// Display name.
    #[validate(length(min = 1, max = 50))]
    pub display: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub description: String,
    /// Default spam sensitivity.
    #[serde(default = "default_sensitivity")]
    pub default_sensitivity: i32,
}

impl From<CreateNoticeTypeRequest> for CreateNoticeType {
    fn from(req: CreateNoticeTypeRequest) -> Self {
        Self {
            label: req.label,
            display: req.display,
            description: req.description,
            default_sensitivity: req.default_sensitivity,
        }
    }
}

/// Send a notice to some users.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendNoticeRequest {
    /// Recipients.
    #[validate(length(min = 1, message = "At least one recipient is required"))]
    pub users: Vec<UserId>,
    /// Notice type label.
    #[validate(length(min = 1))]
    pub label: String,
    /// Extra template context.
    #[serde(default)]
    pub extra_context: Map<String, Value>,
    /// Object the notice is about.
    #[serde(default)]
    pub sender: Option<ObjectRef>,
    /// Overrides the configured dispatch mode.
    #[serde(default)]
    pub dispatch: Option<DispatchMode>,
}

impl SendNoticeRequest {
    /// Split into the send request and the dispatch override.
    pub fn into_parts(self) -> Result<(SendRequest, Option<DispatchMode>), AppError> {
        let sender = self.sender.map(checked).transpose()?;
        Ok((
            SendRequest {
                users: self.users,
                label: self.label,
                extra_context: self.extra_context,
                sender,
            },
            self.dispatch,
        ))
    }
}

/// Send a notice to every active user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BroadcastNoticeRequest {
    /// Notice type label.
    #[validate(length(min = 1))]
    pub label: String,
    /// Extra template context.
    #[serde(default)]
    pub extra_context: Map<String, Value>,
    /// Object the notice is about.
    #[serde(default)]
    pub sender: Option<ObjectRef>,
    /// Users left out.
    #[serde(default)]
    pub exclude: Vec<UserId>,
    /// Overrides the configured dispatch mode.
    #[serde(default)]
    pub dispatch: Option<DispatchMode>,
}

impl BroadcastNoticeRequest {
    /// Split into the broadcast request and the dispatch override.
    pub fn into_parts(self) -> Result<(BroadcastRequest, Option<DispatchMode>), AppError> {
        let sender = self.sender.map(checked).transpose()?;
        Ok((
            BroadcastRequest {
                label: self.label,
                extra_context: self.extra_context,
                sender,
                exclude: self.exclude,
            },
            self.dispatch,
        ))
    }
}

/// Start or stop observing an object.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservationRequest {
    /// The observer.
    pub user_id: UserId,
    /// Content type of the observed object.
    pub content_type: String,
    /// Id of the observed object.
    pub object_id: String,
    /// Notice type labels.
    #[validate(length(min = 1, message = "At least one label is required"))]
    pub labels: Vec<String>,
}

impl ObservationRequest {
    /// The observed object.
    pub fn observed(&self) -> Result<ObjectRef, AppError> {
        ObjectRef::new(self.content_type.clone(), self.object_id.clone())
    }
}

/// Query of `GET /api/observations/check`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationCheckQuery {
    /// The observer; absent for anonymous visitors.
    pub user_id: Option<UserId>,
    /// Content type of the observed object.
    pub content_type: String,
    /// Id of the observed object.
    pub object_id: String,
    /// Comma-separated notice type labels.
    pub labels: String,
}

impl ObservationCheckQuery {
    /// The observed object.
    pub fn observed(&self) -> Result<ObjectRef, AppError> {
        ObjectRef::new(self.content_type.clone(), self.object_id.clone())
    }
}

/// Query carrying comma-separated labels.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelsQuery {
    /// Comma-separated notice type labels.
    pub labels: String,
}

/// Split a comma-separated label list, dropping blanks.
pub fn split_labels(labels: &str) -> Vec<String> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Notify the observers of an object.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyObserversRequest {
    /// Content type of the observed object.
    pub content_type: String,
    /// Id of the observed object.
    pub object_id: String,
    /// Notice type label.
    pub label: String,
    /// Extra template context.
    #[serde(default)]
    pub extra_context: Map<String, Value>,
    /// Observers left out.
    #[serde(default)]
    pub exclude: Vec<UserId>,
    /// Sender; defaults to the observed object.
    #[serde(default)]
    pub sender: Option<ObjectRef>,
}

impl TryFrom<NotifyObserversRequest> for ObservationNotice {
    type Error = AppError;

    fn try_from(req: NotifyObserversRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            observed: ObjectRef::new(req.content_type, req.object_id)?,
            label: req.label,
            extra_context: req.extra_context,
            exclude: req.exclude,
            sender: req.sender.map(checked).transpose()?,
        })
    }
}

/// `next_page` redirect target.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextPageQuery {
    /// Where to go afterwards.
    pub next_page: Option<String>,
}

/// Query of `GET /notices/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleQuery {
    /// Mark the notice seen (default true).
    #[serde(default = "default_true")]
    pub mark_seen: bool,
}

/// Query of `GET /notices/view/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewSenderQuery {
    /// Explicit redirect target.
    pub sender_url: Option<String>,
}

/// Re-validate a deserialized reference.
fn checked(object: ObjectRef) -> Result<ObjectRef, AppError> {
    ObjectRef::new(object.content_type, object.object_id)
}

fn default_true() -> bool {
    true
}

fn default_sensitivity() -> i32 {
    notice_entity::notice_type::DEFAULT_SENSITIVITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_labels() {
        assert_eq!(split_labels(" reply, ,edit"), vec!["reply", "edit"]);
        assert!(split_labels("").is_empty());
    }

    #[test]
    fn test_upsert_user_rejects_bad_email() {
        let req: UpsertUserRequest = serde_json::from_value(serde_json::json!({
            "id": UserId::new(),
            "username": "ana",
            "email": "not-an-address",
        }))
        .unwrap();
        assert!(req.validate().is_err());
        assert!(req.is_active);
    }

    #[test]
    fn test_sender_with_slash_rejected() {
        let req: SendNoticeRequest = serde_json::from_value(serde_json::json!({
            "users": [UserId::new()],
            "label": "comment",
            "sender": { "content_type": "post", "object_id": "1/2" },
        }))
        .unwrap();
        assert!(req.into_parts().is_err());
    }
}

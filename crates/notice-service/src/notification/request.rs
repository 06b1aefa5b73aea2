//! Send requests. These are also the payloads of queued batches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;

/// Send a notice of one type to a set of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Recipients.
    pub users: Vec<UserId>,
    /// Notice type label.
    pub label: String,
    /// Extra template context.
    #[serde(default)]
    pub extra_context: Map<String, Value>,
    /// Object the notice is about.
    #[serde(default)]
    pub sender: Option<ObjectRef>,
}

/// Send a notice of one type to every active user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    /// Notice type label.
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
}

/// Anything that emits notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitRequest {
    /// Targeted send.
    Send(SendRequest),
    /// Broadcast to all active users.
    Broadcast(BroadcastRequest),
}

impl EmitRequest {
    /// Notice type label of the request.
    pub fn label(&self) -> &str {
        match self {
            Self::Send(request) => &request.label,
            Self::Broadcast(request) => &request.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_request_is_tagged() {
        let request = EmitRequest::Broadcast(BroadcastRequest {
            label: "maintenance".into(),
            extra_context: Map::new(),
            sender: None,
            exclude: vec![],
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "broadcast");
        assert_eq!(json["label"], "maintenance");
    }

    #[test]
    fn test_send_request_defaults() {
        let request: SendRequest =
            serde_json::from_str(r#"{"users":[],"label":"comment"}"#).unwrap();
        assert!(request.extra_context.is_empty());
        assert!(request.sender.is_none());
    }
}

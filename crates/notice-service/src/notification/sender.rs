//! Paths to sender objects on the host site.

use std::collections::HashMap;

use serde_json::{Map, Value};

use notice_core::types::ObjectRef;

/// Context key that overrides the generated sender path.
pub const SENDER_PATH_KEY: &str = "sender_path";

/// Path of the sender object, relative to the site root.
///
/// An explicit non-empty `sender_path` in the extra context wins. Otherwise
/// the path is generated from the sender as `/{content_type}/{object_id}/`,
/// with the content type replaced through `translations`. Without either,
/// the path is empty.
pub fn sender_path(
    extra_context: &Map<String, Value>,
    sender: Option<&ObjectRef>,
    translations: &HashMap<String, String>,
) -> String {
    if let Some(path) = extra_context.get(SENDER_PATH_KEY).and_then(Value::as_str) {
        if !path.is_empty() {
            return path.to_string();
        }
    }
    sender
        .map(|s| s.default_path(translations))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_explicit_path_wins() {
        let sender = ObjectRef::new("user", "3").unwrap();
        let path = sender_path(
            &context(json!({ "sender_path": "/people/ana/" })),
            Some(&sender),
            &HashMap::new(),
        );
        assert_eq!(path, "/people/ana/");
    }

    #[test]
    fn test_generated_path_uses_translation() {
        let sender = ObjectRef::new("user", "3").unwrap();
        let mut translations = HashMap::new();
        translations.insert("user".to_string(), "profile".to_string());
        let path = sender_path(&Map::new(), Some(&sender), &translations);
        assert_eq!(path, "/profile/3/");
    }

    #[test]
    fn test_no_sender_no_path() {
        assert_eq!(sender_path(&Map::new(), None, &HashMap::new()), "");
        assert_eq!(
            sender_path(&context(json!({ "sender_path": "" })), None, &HashMap::new()),
            ""
        );
    }
}

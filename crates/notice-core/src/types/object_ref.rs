//! Generic references to objects owned by the host application.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Points at any host object: the sender of a notice or an observed object.
///
/// The service never dereferences these; it only stores them and builds
/// paths from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Host-side model name, e.g. `"user"` or `"blogpost"`.
    pub content_type: String,
    /// Host-side primary key, rendered as text.
    pub object_id: String,
}

impl ObjectRef {
    /// Build a reference, rejecting empty parts and parts containing `/`.
    pub fn new(
        content_type: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Result<Self, AppError> {
        let content_type = content_type.into();
        let object_id = object_id.into();
        for (name, value) in [("content_type", &content_type), ("object_id", &object_id)] {
            if value.is_empty() || value.contains('/') || value.chars().any(char::is_whitespace) {
                return Err(AppError::validation(format!(
                    "Invalid object reference {name}: '{value}'"
                )));
            }
        }
        Ok(Self {
            content_type,
            object_id,
        })
    }

    /// Default absolute path of the object: `/{content_type}/{object_id}/`.
    ///
    /// `translations` maps a content type to the path segment to use instead.
    pub fn default_path(&self, translations: &HashMap<String, String>) -> String {
        let segment = translations
            .get(&self.content_type)
            .map(String::as_str)
            .unwrap_or(self.content_type.as_str());
        format!("/{}/{}/", segment.trim_matches('/'), self.object_id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type, self.object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let obj = ObjectRef::new("blogpost", "42").expect("valid");
        assert_eq!(obj.default_path(&HashMap::new()), "/blogpost/42/");
    }

    #[test]
    fn test_default_path_uses_translation() {
        let obj = ObjectRef::new("user", "7").expect("valid");
        let mut translations = HashMap::new();
        translations.insert("user".to_string(), "profile".to_string());
        assert_eq!(obj.default_path(&translations), "/profile/7/");
    }

    #[test]
    fn test_rejects_slashes_and_empty() {
        assert!(ObjectRef::new("", "1").is_err());
        assert!(ObjectRef::new("a/b", "1").is_err());
        assert!(ObjectRef::new("post", "1 2").is_err());
    }
}

//! User domain model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A staff member as reported by the identity endpoint
///
/// Only `name` is interpreted. Anything else the server sends is kept in
/// `extra` so it survives a round trip through `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            username: None,
            name: name.into(),
            extra: HashMap::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Text shown next to the logout control
    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Ms. Rodriguez").with_username("mrodriguez");
        assert_eq!(user.name, "Ms. Rodriguez");
        assert_eq!(user.username.as_deref(), Some("mrodriguez"));
        assert_eq!(user.greeting(), "Welcome, Ms. Rodriguez");
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let user: User = serde_json::from_str(
            r#"{"username": "teacher", "name": "Mr. Chen", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(user.name, "Mr. Chen");
        assert_eq!(user.extra.get("role"), Some(&JsonValue::from("admin")));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], "admin");
        assert_eq!(back["username"], "teacher");
    }
}

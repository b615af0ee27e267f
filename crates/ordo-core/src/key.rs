//! Key types for document records
//!
//! JSON documents carry their identifier as a plain value. Only integers
//! and strings are usable as keys since they hash and compare exactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier value of a [`Document`](crate::Document)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentKey {
    Int(i64),
    Text(String),
}

impl DocumentKey {
    /// Extract a key from a JSON value
    ///
    /// Returns `None` for `null`, booleans, arrays, objects and numbers that
    /// do not fit an `i64`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(DocumentKey::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(DocumentKey::Int),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DocumentKey::Int(n) => Value::from(*n),
            DocumentKey::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentKey::Text(s) => Some(s),
            DocumentKey::Int(_) => None,
        }
    }
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Int(n) => write!(f, "{n}"),
            DocumentKey::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Int(n) => write!(f, "{n}"),
            DocumentKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DocumentKey {
    fn from(s: &str) -> Self {
        DocumentKey::Text(s.to_string())
    }
}

impl From<String> for DocumentKey {
    fn from(s: String) -> Self {
        DocumentKey::Text(s)
    }
}

impl From<i64> for DocumentKey {
    fn from(n: i64) -> Self {
        DocumentKey::Int(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_from_value() {
        assert_eq!(DocumentKey::from_value(&json!("a")), Some(DocumentKey::from("a")));
        assert_eq!(DocumentKey::from_value(&json!(7)), Some(DocumentKey::from(7i64)));
        assert_eq!(DocumentKey::from_value(&json!(1.5)), None);
        assert_eq!(DocumentKey::from_value(&json!(null)), None);
        assert_eq!(DocumentKey::from_value(&json!({ "a": 1 })), None);
    }

    #[test]
    fn test_key_formatting() {
        let text = DocumentKey::from("x");
        assert_eq!(format!("{text:?}"), "\"x\"");
        assert_eq!(text.to_string(), "x");
        assert_eq!(format!("{:?}", DocumentKey::Int(4)), "4");
    }

    #[test]
    fn test_key_value_roundtrip() {
        let key = DocumentKey::Int(-12);
        assert_eq!(DocumentKey::from_value(&key.to_value()), Some(key));
    }
}

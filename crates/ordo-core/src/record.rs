//! Record capability and the stock JSON document record
//!
//! A record is any value that can expose a key under a named identifier
//! field. The capability is checked once at the boundary (initialization,
//! add, replace); the engine relies on it afterwards.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{DocumentKey, Field, OrdoError, OrdoResult};

/// A uniquely identified value stored in a collection
pub trait Record: Clone {
    /// Identifier value type
    type Key: Clone + Eq + Hash + fmt::Debug;
    /// Partial field patch accepted by updates
    type Patch;

    /// Key under the given identifier field, `None` if absent
    fn key(&self, identifier: &str) -> Option<Self::Key>;

    /// Comparable view of a named field, `None` if absent or unordered
    fn field(&self, name: &str) -> Option<Field<'_>>;

    /// Shallow merge: fields in `patch` override, all others are retained
    fn merge(&self, patch: &Self::Patch) -> Self;

    /// Synthesize a key for a record that lacks one
    ///
    /// Returns `false` when the record type cannot generate keys.
    fn assign_generated_key(&mut self, _identifier: &str) -> bool {
        false
    }
}

/// Read the key of a record or report which position lacks it
pub fn require_key<R: Record>(record: &R, identifier: &str, position: usize) -> OrdoResult<R::Key> {
    record
        .key(identifier)
        .ok_or_else(|| OrdoError::missing_identifier(identifier, position))
}

/// JSON object record
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Document(Map::new())
    }

    /// Build a document from a JSON value, which must be an object
    pub fn from_value(value: Value) -> OrdoResult<Self> {
        match value {
            Value::Object(map) => Ok(Document(map)),
            other => Err(OrdoError::InvalidArgument(format!(
                "document must be a JSON object, got {other}"
            ))),
        }
    }

    /// Get a raw field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Insert or replace a field
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`Document::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = OrdoError;

    fn try_from(value: Value) -> OrdoResult<Self> {
        Document::from_value(value)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Document(map)
    }
}

impl Record for Document {
    type Key = DocumentKey;
    type Patch = Document;

    fn key(&self, identifier: &str) -> Option<DocumentKey> {
        self.0.get(identifier).and_then(DocumentKey::from_value)
    }

    fn field(&self, name: &str) -> Option<Field<'_>> {
        self.0.get(name).and_then(Field::from_value)
    }

    fn merge(&self, patch: &Document) -> Document {
        let mut merged = self.0.clone();
        for (name, value) in &patch.0 {
            merged.insert(name.clone(), value.clone());
        }
        Document(merged)
    }

    fn assign_generated_key(&mut self, identifier: &str) -> bool {
        let id = Uuid::new_v4().to_string();
        self.0.insert(identifier.to_string(), Value::String(id));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn test_document_key() {
        let d = doc(json!({ "id": "c", "value": 30 }));
        assert_eq!(d.key("id"), Some(DocumentKey::from("c")));
        assert_eq!(d.key("uid"), None);

        let nulled = doc(json!({ "id": null }));
        assert_eq!(nulled.key("id"), None);
        assert!(require_key(&nulled, "id", 4).is_err());
    }

    #[test]
    fn test_document_shallow_merge() {
        let d = doc(json!({ "id": "a", "value": 1, "nested": { "x": 1 } }));
        let patch = doc(json!({ "value": 2, "nested": { "y": 2 } }));
        let merged = d.merge(&patch);

        assert_eq!(
            merged.into_value(),
            json!({ "id": "a", "value": 2, "nested": { "y": 2 } })
        );
        // source untouched
        assert_eq!(d.get("value"), Some(&json!(1)));
    }

    #[test]
    fn test_document_rejects_non_object() {
        assert!(matches!(
            Document::from_value(json!([1, 2])),
            Err(OrdoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_generated_key() {
        let mut d = doc(json!({ "value": 1 }));
        assert!(d.assign_generated_key("id"));
        let key = d.key("id").unwrap();
        assert_eq!(key.as_str().map(str::len), Some(36));
    }
}

//! Recovery policies
//!
//! Policies are the only recovery path for a failing action. A policy
//! either substitutes a record (`Some`) or asks the action to skip the
//! affected record (`None`). Without a policy the failure propagates.

use std::fmt;
use std::sync::Arc;

use crate::Record;

/// Invoked when `add` meets a key that is already present
pub trait DuplicatePolicy<R: Record>: Send + Sync {
    /// `existing` is the record already holding `key`. Returns the record to
    /// insert instead of the incoming one, or `None` to skip it.
    fn on_duplicate(&self, existing: &R, key: &R::Key) -> Option<R>;
}

impl<R, F> DuplicatePolicy<R> for F
where
    R: Record,
    F: Fn(&R, &R::Key) -> Option<R> + Send + Sync,
{
    fn on_duplicate(&self, existing: &R, key: &R::Key) -> Option<R> {
        self(existing, key)
    }
}

/// Which action failed to resolve its target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissingKind {
    Remove,
    Update,
}

impl fmt::Display for MissingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingKind::Remove => f.write_str("remove"),
            MissingKind::Update => f.write_str("update"),
        }
    }
}

/// Invoked when `remove`/`update` cannot resolve their target
pub trait MissingPolicy<R: Record>: Send + Sync {
    /// `key` is the unresolved key, `None` when the target was an index.
    /// A returned record redirects the action to that record's key.
    fn on_missing(&self, kind: MissingKind, key: Option<&R::Key>) -> Option<R>;
}

impl<R, F> MissingPolicy<R> for F
where
    R: Record,
    F: Fn(MissingKind, Option<&R::Key>) -> Option<R> + Send + Sync,
{
    fn on_missing(&self, kind: MissingKind, key: Option<&R::Key>) -> Option<R> {
        self(kind, key)
    }
}

/// Configured recovery hooks
pub struct Policies<R: Record> {
    pub duplicate: Option<Arc<dyn DuplicatePolicy<R>>>,
    pub missing: Option<Arc<dyn MissingPolicy<R>>>,
}

impl<R: Record> Policies<R> {
    pub fn new() -> Self {
        Policies {
            duplicate: None,
            missing: None,
        }
    }

    pub fn with_duplicate(mut self, policy: impl DuplicatePolicy<R> + 'static) -> Self {
        self.duplicate = Some(Arc::new(policy));
        self
    }

    pub fn with_missing(mut self, policy: impl MissingPolicy<R> + 'static) -> Self {
        self.missing = Some(Arc::new(policy));
        self
    }
}

impl<R: Record> Default for Policies<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for Policies<R> {
    fn clone(&self) -> Self {
        Policies {
            duplicate: self.duplicate.clone(),
            missing: self.missing.clone(),
        }
    }
}

impl<R: Record> fmt::Debug for Policies<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policies")
            .field("duplicate", &self.duplicate.is_some())
            .field("missing", &self.missing.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, DocumentKey};

    #[test]
    fn test_closure_policies() {
        let policies = Policies::<Document>::new()
            .with_duplicate(|existing: &Document, _key: &DocumentKey| {
                Some(existing.clone().with("id", "copy"))
            })
            .with_missing(|_kind: MissingKind, _key: Option<&DocumentKey>| -> Option<Document> { None });

        let existing = Document::new().with("id", "a");
        let replaced = policies
            .duplicate
            .as_ref()
            .unwrap()
            .on_duplicate(&existing, &DocumentKey::from("a"));
        assert_eq!(replaced.unwrap().get("id"), Some(&serde_json::Value::from("copy")));

        let missing = policies.missing.as_ref().unwrap();
        assert!(missing.on_missing(MissingKind::Update, None).is_none());
        assert_eq!(format!("{policies:?}"), "Policies { duplicate: true, missing: true }");
    }
}

//! Locator resolution
//!
//! Turns a locator into an absolute position within a snapshot. Resolution
//! never looks at anything but the records passed in.

use ordo_core::{Locator, Record};

/// Position of the first record carrying `key`
pub fn position_of<R: Record>(records: &[R], identifier: &str, key: &R::Key) -> Option<usize> {
    records
        .iter()
        .position(|record| record.key(identifier).as_ref() == Some(key))
}

/// Resolve a locator to a position, `None` if its key is absent
///
/// `Index` is returned as-is; bounds are the caller's concern. `End`
/// resolves to the length, one past the last record.
pub fn resolve<R: Record>(records: &[R], identifier: &str, locator: &Locator<R::Key>) -> Option<usize> {
    match locator {
        Locator::Index(n) => Some(*n),
        Locator::ByKey(key) | Locator::Before(key) => position_of(records, identifier, key),
        Locator::After(key) => position_of(records, identifier, key).map(|i| i + 1),
        Locator::Start => Some(0),
        Locator::End => Some(records.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_core::{Document, DocumentKey};
    use serde_json::json;

    fn records() -> Vec<Document> {
        ["a", "b", "c"]
            .iter()
            .map(|id| Document::from_value(json!({ "id": id })).unwrap())
            .collect()
    }

    fn key(s: &str) -> DocumentKey {
        DocumentKey::from(s)
    }

    #[test]
    fn test_resolve_variants() {
        let records = records();

        assert_eq!(resolve(&records, "id", &Locator::Index(7)), Some(7));
        assert_eq!(resolve(&records, "id", &Locator::ByKey(key("b"))), Some(1));
        assert_eq!(resolve(&records, "id", &Locator::Before(key("b"))), Some(1));
        assert_eq!(resolve(&records, "id", &Locator::After(key("b"))), Some(2));
        assert_eq!(resolve(&records, "id", &Locator::After(key("c"))), Some(3));
        assert_eq!(resolve(&records, "id", &Locator::Start), Some(0));
        assert_eq!(resolve(&records, "id", &Locator::End), Some(3));
    }

    #[test]
    fn test_resolve_missing_anchor() {
        let records = records();

        assert_eq!(resolve(&records, "id", &Locator::ByKey(key("z"))), None);
        assert_eq!(resolve(&records, "id", &Locator::Before(key("z"))), None);
        assert_eq!(resolve(&records, "id", &Locator::After(key("z"))), None);
    }

    #[test]
    fn test_resolve_uses_identifier_field() {
        let records = vec![Document::from_value(json!({ "id": "x", "uid": "a" })).unwrap()];

        assert_eq!(resolve(&records, "uid", &Locator::ByKey(key("a"))), Some(0));
        assert_eq!(resolve(&records, "id", &Locator::ByKey(key("a"))), None);
    }
}

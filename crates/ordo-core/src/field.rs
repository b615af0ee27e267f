//! Field values and their ordering
//!
//! Field-sort reorders compare the extracted field of two records. Text is
//! compared with a locale-aware collation, numbers and booleans by their
//! natural order. Values of unrelated kinds compare equal so that a stable
//! sort leaves them where they were.

use std::cmp::Ordering;

use serde_json::Value;

/// Borrowed, comparable view of a record field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Field<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> Field<'a> {
    /// View a JSON value as a field. Arrays and objects have no ordering.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Null => Some(Field::Null),
            Value::Bool(b) => Some(Field::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Field::Int(i)),
                None => n.as_f64().map(Field::Float),
            },
            Value::String(s) => Some(Field::Text(s)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[inline]
    fn as_f64(&self) -> Option<f64> {
        match *self {
            Field::Int(i) => Some(i as f64),
            Field::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Three-way comparison against another field
    pub fn compare(&self, other: &Field<'_>) -> Ordering {
        match (self, other) {
            (Field::Text(a), Field::Text(b)) => locale_cmp(a, b),
            (Field::Int(a), Field::Int(b)) => a.cmp(b),
            (Field::Bool(a), Field::Bool(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        }
    }
}

/// Compare two optional fields; a missing field is equal to anything
pub fn compare_fields(a: Option<Field<'_>>, b: Option<Field<'_>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(&b),
        _ => Ordering::Equal,
    }
}

/// Locale-aware string comparison
///
/// Primary order ignores case; when two strings differ only in case the
/// lowercase form sorts first, then raw code points break any remaining tie.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => break,
        }
    }

    a.cmp(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_numeric_fields_mix() {
        let a = json!(2);
        let b = json!(2.5);
        let fa = Field::from_value(&a).unwrap();
        let fb = Field::from_value(&b).unwrap();
        assert_eq!(fa.compare(&fb), Ordering::Less);
        assert_eq!(fb.compare(&fa), Ordering::Greater);
    }

    #[test]
    fn test_unrelated_kinds_are_equal() {
        let text = json!("10");
        let num = json!(10);
        let ft = Field::from_value(&text);
        let fn_ = Field::from_value(&num);
        assert_eq!(compare_fields(ft, fn_), Ordering::Equal);
        assert_eq!(compare_fields(None, fn_), Ordering::Equal);
        assert_eq!(Field::from_value(&json!([1, 2])), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_locale_cmp_antisymmetric(a in "[a-zA-Z]{0,6}", b in "[a-zA-Z]{0,6}") {
            proptest::prop_assert_eq!(locale_cmp(&a, &b), locale_cmp(&b, &a).reverse());
        }

        #[test]
        fn prop_locale_cmp_equal_only_when_identical(a in "[a-zA-Z]{0,6}", b in "[a-zA-Z]{0,6}") {
            proptest::prop_assert_eq!(locale_cmp(&a, &b) == Ordering::Equal, a == b);
        }
    }
}

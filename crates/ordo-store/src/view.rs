//! Observation views
//!
//! Views borrow the current snapshot and are rebuilt on every read, so
//! they can never drift from the sequence they were built from.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use ordo_core::Record;
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

/// Identifier -> record projection, in sequence order
pub struct KeyedView<'a, R: Record> {
    entries: IndexMap<R::Key, &'a R>,
}

impl<'a, R: Record> KeyedView<'a, R> {
    pub fn build(records: &'a [R], identifier: &str) -> Self {
        let entries = records
            .iter()
            .filter_map(|record| record.key(identifier).map(|key| (key, record)))
            .collect();
        KeyedView { entries }
    }

    pub fn get(&self, key: &R::Key) -> Option<&'a R> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, R::Key, &'a R> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R::Key, &'a R)> + '_ {
        self.entries.iter().map(|(k, r)| (k, *r))
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for KeyedView<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Serializes as a map keyed by each key's `Display` form
///
/// Distinct keys that display alike (`7` and `"7"`) would collapse into one
/// entry, so they fail serialization instead.
impl<R> Serialize for KeyedView<'_, R>
where
    R: Record + Serialize,
    R::Key: fmt::Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut rendered = HashSet::with_capacity(self.entries.len());
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            let name = key.to_string();
            if !rendered.insert(name.clone()) {
                return Err(S::Error::custom(format!(
                    "keyed view holds distinct keys that both render as {name:?}"
                )));
            }
            map.serialize_entry(&name, *record)?;
        }
        map.end()
    }
}

/// What an observer sees, chosen by the configured transformer
pub enum View<'a, R: Record> {
    Array(&'a [R]),
    Keyed(KeyedView<'a, R>),
}

impl<'a, R: Record> View<'a, R> {
    pub fn len(&self) -> usize {
        match self {
            View::Array(records) => records.len(),
            View::Keyed(keyed) => keyed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_array(&self) -> Option<&'a [R]> {
        match self {
            View::Array(records) => Some(*records),
            View::Keyed(_) => None,
        }
    }

    pub fn as_keyed(&self) -> Option<&KeyedView<'a, R>> {
        match self {
            View::Keyed(keyed) => Some(keyed),
            View::Array(_) => None,
        }
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for View<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Array(records) => f.debug_tuple("Array").field(records).finish(),
            View::Keyed(keyed) => f.debug_tuple("Keyed").field(keyed).finish(),
        }
    }
}

impl<R> Serialize for View<'_, R>
where
    R: Record + Serialize,
    R::Key: fmt::Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            View::Array(records) => serializer.collect_seq(records.iter()),
            View::Keyed(keyed) => keyed.serialize(serializer),
        }
    }
}

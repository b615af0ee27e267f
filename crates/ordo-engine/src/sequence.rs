//! Sequence - the ordered, uniquely keyed snapshot
//!
//! A sequence is never mutated in place. Actions build a new one; cloning
//! a snapshot only bumps a reference count.

use std::collections::HashSet;
use std::sync::Arc;

use ordo_core::{require_key, OrdoError, OrdoResult, Record};

use crate::resolve::position_of;

/// Immutable ordered list of records
#[derive(Debug)]
pub struct Sequence<R> {
    records: Arc<[R]>,
}

impl<R> Sequence<R> {
    pub fn empty() -> Self {
        Sequence {
            records: Arc::from(Vec::new()),
        }
    }

    /// Wrap records that are already known to be valid
    pub(crate) fn from_vec(records: Vec<R>) -> Self {
        Sequence {
            records: Arc::from(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Whether both snapshots share the same storage
    pub fn ptr_eq(&self, other: &Sequence<R>) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl<R: Record> Sequence<R> {
    /// Build a validated sequence
    ///
    /// Every record must carry the identifier field, unless `auto_id` is set
    /// and the record type can generate one. Keys must be unique.
    pub fn from_records<I>(records: I, identifier: &str, auto_id: bool) -> OrdoResult<Self>
    where
        I: IntoIterator<Item = R>,
    {
        let mut seen = HashSet::new();
        let mut validated = Vec::new();

        for (position, mut record) in records.into_iter().enumerate() {
            if auto_id && record.key(identifier).is_none() {
                record.assign_generated_key(identifier);
            }
            let key = require_key(&record, identifier, position)?;
            if !seen.insert(key.clone()) {
                return Err(OrdoError::duplicate(&key));
            }
            validated.push(record);
        }

        Ok(Sequence::from_vec(validated))
    }

    /// Keys in sequence order
    pub fn keys<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = R::Key> + 'a {
        self.records.iter().filter_map(move |r| r.key(identifier))
    }

    pub fn position_of(&self, identifier: &str, key: &R::Key) -> Option<usize> {
        position_of(&self.records, identifier, key)
    }

    pub fn find(&self, identifier: &str, key: &R::Key) -> Option<&R> {
        self.position_of(identifier, key).map(|i| &self.records[i])
    }

    pub fn contains_key(&self, identifier: &str, key: &R::Key) -> bool {
        self.position_of(identifier, key).is_some()
    }

    pub fn to_vec(&self) -> Vec<R> {
        self.records.to_vec()
    }
}

impl<R> Clone for Sequence<R> {
    fn clone(&self) -> Self {
        Sequence {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R> Default for Sequence<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: PartialEq> PartialEq for Sequence<R> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<'a, R> IntoIterator for &'a Sequence<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

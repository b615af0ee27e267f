//! Remove - drop records by position, key or predicate

use std::fmt;

use ordo_core::{MissingKind, OrdoResult, Record};
use tracing::debug;

use crate::actions::Recovery;
use crate::{ActionSet, Sequence};

/// What `remove` should drop
pub enum RemoveTarget<'a, R: Record> {
    /// The record at this position; out of range is a no-op
    Index(usize),
    /// The record carrying this key
    ByKey(R::Key),
    /// Every record the predicate accepts, in sequence order
    Matching(Box<dyn FnMut(&R::Key, &R) -> bool + 'a>),
}

impl<'a, R: Record> RemoveTarget<'a, R> {
    pub fn matching(predicate: impl FnMut(&R::Key, &R) -> bool + 'a) -> Self {
        RemoveTarget::Matching(Box::new(predicate))
    }
}

impl<R: Record> fmt::Debug for RemoveTarget<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveTarget::Index(n) => f.debug_tuple("Index").field(n).finish(),
            RemoveTarget::ByKey(k) => f.debug_tuple("ByKey").field(k).finish(),
            RemoveTarget::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

impl<R: Record> ActionSet<R> {
    /// Remove records from a snapshot
    ///
    /// `amount` caps how many predicate matches are removed; `None` or zero
    /// removes them all. Position and key targets remove at most one record
    /// and ignore `amount`.
    pub fn remove(
        &self,
        sequence: &Sequence<R>,
        target: RemoveTarget<'_, R>,
        amount: Option<usize>,
    ) -> OrdoResult<Sequence<R>> {
        // zero means no limit
        let limit = amount.filter(|&n| n > 0);

        match target {
            RemoveTarget::Index(index) => Ok(self.remove_at(sequence, index)),
            RemoveTarget::ByKey(key) => {
                if let Some(index) = sequence.position_of(self.identifier(), &key) {
                    return Ok(self.remove_at(sequence, index));
                }
                match self.recover(MissingKind::Remove, Some(&key))? {
                    Recovery::Redirect(redirect) => match sequence.position_of(self.identifier(), &redirect) {
                        Some(index) => Ok(self.remove_at(sequence, index)),
                        None => Ok(sequence.clone()),
                    },
                    Recovery::Skip | Recovery::Unhandled => {
                        debug!(?key, "remove of absent key ignored");
                        Ok(sequence.clone())
                    }
                }
            }
            RemoveTarget::Matching(mut predicate) => {
                let mut removed = 0usize;
                let mut kept = Vec::with_capacity(sequence.len());

                for record in sequence {
                    let exhausted = limit.is_some_and(|limit| removed >= limit);
                    if !exhausted {
                        if let Some(key) = record.key(self.identifier()) {
                            if predicate(&key, record) {
                                removed += 1;
                                continue;
                            }
                        }
                    }
                    kept.push(record.clone());
                }

                if removed == 0 {
                    return Ok(sequence.clone());
                }
                debug!(removed, len = kept.len(), "remove applied");
                Ok(Sequence::from_vec(kept))
            }
        }
    }

    fn remove_at(&self, sequence: &Sequence<R>, index: usize) -> Sequence<R> {
        if index >= sequence.len() {
            debug!(index, len = sequence.len(), "remove index out of range ignored");
            return sequence.clone();
        }

        let existing = sequence.as_slice();
        let mut records = Vec::with_capacity(existing.len() - 1);
        records.extend_from_slice(&existing[..index]);
        records.extend_from_slice(&existing[index + 1..]);

        debug!(index, len = records.len(), "remove applied");
        Sequence::from_vec(records)
    }
}

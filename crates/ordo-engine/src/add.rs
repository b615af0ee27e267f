//! Add - insert a batch of records as one contiguous block

use std::collections::HashMap;

use ordo_core::{require_key, Locator, OrdoError, OrdoResult, Position, Record};
use tracing::{debug, warn};

use crate::{ActionSet, Sequence};

impl<R: Record> ActionSet<R> {
    /// Insert `records` at `target`, keeping their relative order
    ///
    /// Key collisions, against the sequence or earlier in the same batch, go
    /// through the duplicate policy. `Index` past the end appends.
    pub fn add<I>(&self, sequence: &Sequence<R>, records: I, target: Position<R::Key>) -> OrdoResult<Sequence<R>>
    where
        I: IntoIterator<Item = R>,
    {
        // Stage 1: every incoming record must carry a key
        let mut incoming = Vec::new();
        for (position, mut record) in records.into_iter().enumerate() {
            if self.auto_id() && record.key(self.identifier()).is_none() {
                record.assign_generated_key(self.identifier());
            }
            let key = require_key(&record, self.identifier(), position)?;
            incoming.push((position, record, key));
        }

        // Stage 2: the insertion point must resolve
        let existing = sequence.as_slice();
        let at = match target {
            Position::Index(n) => n.min(existing.len()),
            other => {
                let locator = Locator::from(other);
                self.resolve(sequence, &locator)
                    .ok_or_else(|| OrdoError::not_found(&locator))?
            }
        };

        // Stage 3: collisions
        let held: HashMap<R::Key, usize> = existing
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.key(self.identifier()).map(|k| (k, i)))
            .collect();
        let mut accepted: Vec<R> = Vec::with_capacity(incoming.len());
        let mut accepted_keys: HashMap<R::Key, usize> = HashMap::new();

        for (position, record, key) in incoming {
            let holder = match held.get(&key) {
                Some(&i) => Some(&existing[i]),
                None => accepted_keys.get(&key).map(|&i| &accepted[i]),
            };

            let (record, key) = match holder {
                None => (record, key),
                Some(holder) => {
                    let Some(policy) = &self.policies().duplicate else {
                        return Err(OrdoError::duplicate(&key));
                    };
                    let Some(replacement) = policy.on_duplicate(holder, &key) else {
                        warn!(?key, "duplicate skipped by policy");
                        continue;
                    };
                    let replaced_key = require_key(&replacement, self.identifier(), position)?;
                    if held.contains_key(&replaced_key) || accepted_keys.contains_key(&replaced_key) {
                        return Err(OrdoError::duplicate(&replaced_key));
                    }
                    warn!(?key, ?replaced_key, "duplicate replaced by policy");
                    (replacement, replaced_key)
                }
            };

            accepted_keys.insert(key, accepted.len());
            accepted.push(record);
        }

        if accepted.is_empty() {
            return Ok(sequence.clone());
        }

        let inserted = accepted.len();
        let mut records = Vec::with_capacity(existing.len() + inserted);
        records.extend_from_slice(&existing[..at]);
        records.extend(accepted);
        records.extend_from_slice(&existing[at..]);

        debug!(inserted, at, len = records.len(), "add applied");
        Ok(Sequence::from_vec(records))
    }
}

//! Update - shallow-merge a patch into one record

use ordo_core::{require_key, Locator, MissingKind, OrdoError, OrdoResult, Record, Target};
use tracing::debug;

use crate::actions::Recovery;
use crate::{ActionSet, Sequence};

impl<R: Record> ActionSet<R> {
    /// Merge `changes` into the record at `target`
    ///
    /// The patch may rewrite the identifier, as long as the new key is not
    /// held by another record. Uniqueness is checked again whenever the key
    /// changes: landing on a held key fails with `DuplicateIdentifier`, and a
    /// patch that drops the identifier fails with `MissingIdentifier`.
    pub fn update(&self, sequence: &Sequence<R>, target: Target<R::Key>, changes: R::Patch) -> OrdoResult<Sequence<R>> {
        let locator = Locator::from(target);
        let resolved = self
            .resolve(sequence, &locator)
            .filter(|&index| index < sequence.len());

        let index = match resolved {
            Some(index) => index,
            None => {
                let key = match &locator {
                    Locator::ByKey(key) => Some(key),
                    _ => None,
                };
                match self.recover(MissingKind::Update, key)? {
                    Recovery::Redirect(redirect) => sequence
                        .position_of(self.identifier(), &redirect)
                        .ok_or_else(|| OrdoError::not_found(Locator::ByKey(redirect)))?,
                    Recovery::Skip => return Ok(sequence.clone()),
                    Recovery::Unhandled => return Err(OrdoError::not_found(&locator)),
                }
            }
        };

        let existing = sequence.as_slice();
        let current = &existing[index];
        let merged = current.merge(&changes);

        let new_key = require_key(&merged, self.identifier(), index)?;
        if current.key(self.identifier()).as_ref() != Some(&new_key)
            && sequence.contains_key(self.identifier(), &new_key)
        {
            return Err(OrdoError::duplicate(&new_key));
        }

        let mut records = existing.to_vec();
        records[index] = merged;

        debug!(index, "update applied");
        Ok(Sequence::from_vec(records))
    }
}

//! Move - take one record out and reinsert it elsewhere
//!
//! Both locators resolve against the snapshot before the record is taken
//! out. An `Index` destination names the record's final position. Anchor
//! destinations name a gap between records, so an anchor that lies after
//! the source shifts down by one once the source is taken out.

use ordo_core::{Destination, Locator, OrdoError, OrdoResult, Record, Target};
use tracing::debug;

use crate::{ActionSet, Sequence};

impl<R: Record> ActionSet<R> {
    /// Move the record at `from` to `to`
    ///
    /// Moving a record onto its own position fails with `InvalidMove`.
    pub fn move_record(
        &self,
        sequence: &Sequence<R>,
        from: Target<R::Key>,
        to: Destination<R::Key>,
    ) -> OrdoResult<Sequence<R>> {
        let len = sequence.len();

        let source = match from {
            Target::Index(index) => index,
            Target::ByKey(key) => {
                let locator = Locator::ByKey(key);
                self.resolve(sequence, &locator)
                    .ok_or_else(|| OrdoError::not_found(&locator))?
            }
        };
        if source >= len {
            return Err(OrdoError::InvalidArgument(format!(
                "move source index {source} is out of range for length {len}"
            )));
        }

        let insert_at = match to {
            Destination::Index(index) => {
                if index >= len {
                    return Err(OrdoError::InvalidArgument(format!(
                        "move destination index {index} is out of range for length {len}"
                    )));
                }
                index
            }
            anchor => {
                let locator = Locator::from(anchor);
                let gap = self
                    .resolve(sequence, &locator)
                    .ok_or_else(|| OrdoError::not_found(&locator))?;
                if gap > source {
                    gap - 1
                } else {
                    gap
                }
            }
        };

        if insert_at == source {
            return Err(OrdoError::InvalidMove { index: source });
        }

        let mut records = sequence.to_vec();
        let record = records.remove(source);
        records.insert(insert_at, record);

        debug!(from = source, to = insert_at, "move applied");
        Ok(Sequence::from_vec(records))
    }
}

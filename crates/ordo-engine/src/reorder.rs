//! Reorder - stable sort by field or by caller comparator
//!
//! Sorting goes through a bottom-up merge sort over positions. It is
//! stable, and it stays well defined when a comparator is not a total
//! order, which the standard library sort does not promise.

use std::cmp::Ordering;
use std::fmt;

use ordo_core::{compare_fields, require_key, OrdoResult, Record};
use tracing::trace;

use crate::{ActionSet, Sequence};

/// Sort direction for field reorders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Ascending,
    /// The ascending result reversed; ties come out in reverse order too
    Descending,
}

/// A record with its key, as seen by a reorder comparator
pub struct Entry<'a, R: Record> {
    pub id: &'a R::Key,
    pub record: &'a R,
}

impl<R: Record> Clone for Entry<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Record> Copy for Entry<'_, R> {}

/// Comparator over two entries
pub type Comparator<'a, R> = Box<dyn FnMut(Entry<'_, R>, Entry<'_, R>) -> Ordering + 'a>;

/// Reorder command
pub enum Reorder<'a, R: Record> {
    /// Sort by a named field
    ByField { field: String, direction: Direction },
    /// Sort with a three-way comparator
    Comparator(Comparator<'a, R>),
}

impl<'a, R: Record> Reorder<'a, R> {
    pub fn by_field(field: impl Into<String>, direction: Direction) -> Self {
        Reorder::ByField {
            field: field.into(),
            direction,
        }
    }

    pub fn with(comparator: impl FnMut(Entry<'_, R>, Entry<'_, R>) -> Ordering + 'a) -> Self {
        Reorder::Comparator(Box::new(comparator))
    }
}

impl<R: Record> fmt::Debug for Reorder<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reorder::ByField { field, direction } => f
                .debug_struct("ByField")
                .field("field", field)
                .field("direction", direction)
                .finish(),
            Reorder::Comparator(_) => f.write_str("Comparator(..)"),
        }
    }
}

/// Stable ordering of `0..len` under `cmp`
///
/// `cmp(i, j)` compares the items at positions `i` and `j`. An item only
/// overtakes an earlier one when it compares strictly less.
pub fn stable_order(len: usize, mut cmp: impl FnMut(usize, usize) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    let mut buffer = order.clone();
    let mut width = 1;

    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j, mut k) = (start, mid, start);

            while i < mid && j < end {
                if cmp(order[j], order[i]) == Ordering::Less {
                    buffer[k] = order[j];
                    j += 1;
                } else {
                    buffer[k] = order[i];
                    i += 1;
                }
                k += 1;
            }
            buffer[k..k + (mid - i)].copy_from_slice(&order[i..mid]);
            k += mid - i;
            buffer[k..k + (end - j)].copy_from_slice(&order[j..end]);

            start = end;
        }
        std::mem::swap(&mut order, &mut buffer);
        width *= 2;
    }

    order
}

impl<R: Record> ActionSet<R> {
    /// Reorder a snapshot
    pub fn reorder(&self, sequence: &Sequence<R>, command: Reorder<'_, R>) -> OrdoResult<Sequence<R>> {
        let records = sequence.as_slice();

        let order = match command {
            Reorder::Comparator(mut comparator) => {
                let keys = records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| require_key(r, self.identifier(), i))
                    .collect::<OrdoResult<Vec<_>>>()?;

                stable_order(records.len(), |a, b| {
                    comparator(
                        Entry {
                            id: &keys[a],
                            record: &records[a],
                        },
                        Entry {
                            id: &keys[b],
                            record: &records[b],
                        },
                    )
                })
            }
            Reorder::ByField { field, direction } => {
                let fields: Vec<_> = records.iter().map(|r| r.field(&field)).collect();

                let mut order = stable_order(records.len(), |a, b| compare_fields(fields[a], fields[b]));
                if direction == Direction::Descending {
                    order.reverse();
                }
                order
            }
        };

        trace!(len = records.len(), "reorder applied");
        Ok(Sequence::from_vec(
            order.into_iter().map(|i| records[i].clone()).collect(),
        ))
    }
}

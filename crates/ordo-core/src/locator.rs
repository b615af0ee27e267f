//! Locators - references to positions and records
//!
//! `Locator` is the general form understood by the resolver. Each action
//! accepts a narrowed enum holding only the variants that make sense for
//! it; converting a general locator into a narrowed one rejects the rest
//! with `InvalidArgument`.

use std::fmt;

use crate::{OrdoError, OrdoResult};

/// Any reference to a position within a sequence
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Locator<K> {
    /// Zero-based absolute position
    Index(usize),
    /// The record carrying this key
    ByKey(K),
    /// Immediately before the record carrying this key
    Before(K),
    /// Immediately after the record carrying this key
    After(K),
    Start,
    End,
}

impl<K> Locator<K> {
    fn variant_name(&self) -> &'static str {
        match self {
            Locator::Index(_) => "index",
            Locator::ByKey(_) => "key",
            Locator::Before(_) => "before",
            Locator::After(_) => "after",
            Locator::Start => "start",
            Locator::End => "end",
        }
    }

    fn rejected(&self, action: &str) -> OrdoError {
        OrdoError::InvalidArgument(format!(
            "{} locator is not accepted by {action}",
            self.variant_name()
        ))
    }
}

impl<K: fmt::Debug> fmt::Debug for Locator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<K: fmt::Debug> fmt::Display for Locator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Index(n) => write!(f, "index {n}"),
            Locator::ByKey(k) => write!(f, "key {k:?}"),
            Locator::Before(k) => write!(f, "before {k:?}"),
            Locator::After(k) => write!(f, "after {k:?}"),
            Locator::Start => f.write_str("start"),
            Locator::End => f.write_str("end"),
        }
    }
}

/// Insertion point for `add`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Position<K> {
    Index(usize),
    Start,
    End,
    Before(K),
    After(K),
}

/// A single existing record, for `update`, and the source of `move`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target<K> {
    Index(usize),
    ByKey(K),
}

/// Destination of `move`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination<K> {
    Index(usize),
    Before(K),
    After(K),
}

impl<K> From<Position<K>> for Locator<K> {
    fn from(position: Position<K>) -> Self {
        match position {
            Position::Index(n) => Locator::Index(n),
            Position::Start => Locator::Start,
            Position::End => Locator::End,
            Position::Before(k) => Locator::Before(k),
            Position::After(k) => Locator::After(k),
        }
    }
}

impl<K> From<Target<K>> for Locator<K> {
    fn from(target: Target<K>) -> Self {
        match target {
            Target::Index(n) => Locator::Index(n),
            Target::ByKey(k) => Locator::ByKey(k),
        }
    }
}

impl<K> From<Destination<K>> for Locator<K> {
    fn from(destination: Destination<K>) -> Self {
        match destination {
            Destination::Index(n) => Locator::Index(n),
            Destination::Before(k) => Locator::Before(k),
            Destination::After(k) => Locator::After(k),
        }
    }
}

impl<K> TryFrom<Locator<K>> for Position<K> {
    type Error = OrdoError;

    fn try_from(locator: Locator<K>) -> OrdoResult<Self> {
        match locator {
            Locator::Index(n) => Ok(Position::Index(n)),
            Locator::Start => Ok(Position::Start),
            Locator::End => Ok(Position::End),
            Locator::Before(k) => Ok(Position::Before(k)),
            Locator::After(k) => Ok(Position::After(k)),
            other @ Locator::ByKey(_) => Err(other.rejected("add")),
        }
    }
}

impl<K> TryFrom<Locator<K>> for Target<K> {
    type Error = OrdoError;

    fn try_from(locator: Locator<K>) -> OrdoResult<Self> {
        match locator {
            Locator::Index(n) => Ok(Target::Index(n)),
            Locator::ByKey(k) => Ok(Target::ByKey(k)),
            other => Err(other.rejected("update or move source")),
        }
    }
}

impl<K> TryFrom<Locator<K>> for Destination<K> {
    type Error = OrdoError;

    fn try_from(locator: Locator<K>) -> OrdoResult<Self> {
        match locator {
            Locator::Index(n) => Ok(Destination::Index(n)),
            Locator::Before(k) => Ok(Destination::Before(k)),
            Locator::After(k) => Ok(Destination::After(k)),
            other => Err(other.rejected("move destination")),
        }
    }
}

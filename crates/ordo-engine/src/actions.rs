//! Action set - configuration shared by every transformation
//!
//! The individual actions live in their own modules as `impl ActionSet`
//! blocks: [`add`](crate::add), [`remove`](crate::remove),
//! [`reorder`](crate::reorder), [`relocate`](crate::relocate) and
//! [`update`](crate::update).

use ordo_core::{
    CollectionConfig, Locator, MissingKind, OrdoError, OrdoResult, Policies, Record,
    DEFAULT_IDENTIFIER,
};
use tracing::warn;

use crate::{resolve, Sequence};

/// Outcome of consulting the missing policy
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Recovery<K> {
    /// Retry against this key
    Redirect(K),
    /// Leave the sequence unchanged
    Skip,
    /// No policy configured
    Unhandled,
}

/// Stateless set of transformations bound to one identifier field
#[derive(Clone, Debug)]
pub struct ActionSet<R: Record> {
    identifier: String,
    auto_id: bool,
    policies: Policies<R>,
}

impl<R: Record> ActionSet<R> {
    pub fn new(identifier: impl Into<String>) -> Self {
        ActionSet {
            identifier: identifier.into(),
            auto_id: false,
            policies: Policies::new(),
        }
    }

    pub fn from_config(config: &CollectionConfig, policies: Policies<R>) -> Self {
        ActionSet {
            identifier: config.identifier.clone(),
            auto_id: config.auto_id,
            policies,
        }
    }

    pub fn with_policies(mut self, policies: Policies<R>) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_auto_id(mut self, auto_id: bool) -> Self {
        self.auto_id = auto_id;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn auto_id(&self) -> bool {
        self.auto_id
    }

    pub fn policies(&self) -> &Policies<R> {
        &self.policies
    }

    /// Resolve a locator against a snapshot
    pub fn resolve(&self, sequence: &Sequence<R>, locator: &Locator<R::Key>) -> Option<usize> {
        resolve(sequence.as_slice(), &self.identifier, locator)
    }

    /// Validate a full set of records into a fresh snapshot
    ///
    /// Used for initialization and for unconditional replacement.
    pub fn replace<I>(&self, records: I) -> OrdoResult<Sequence<R>>
    where
        I: IntoIterator<Item = R>,
    {
        Sequence::from_records(records, &self.identifier, self.auto_id)
    }

    /// Ask the missing policy what to do about an unresolved target
    pub(crate) fn recover(&self, kind: MissingKind, key: Option<&R::Key>) -> OrdoResult<Recovery<R::Key>> {
        let Some(policy) = &self.policies.missing else {
            return Ok(Recovery::Unhandled);
        };

        match policy.on_missing(kind, key) {
            None => {
                warn!(%kind, ?key, "missing target skipped by policy");
                Ok(Recovery::Skip)
            }
            Some(record) => match record.key(&self.identifier) {
                Some(redirect) => {
                    warn!(%kind, ?key, ?redirect, "missing target redirected by policy");
                    Ok(Recovery::Redirect(redirect))
                }
                None => Err(OrdoError::InvalidArgument(format!(
                    "missing policy returned a record without \"{}\"",
                    self.identifier
                ))),
            },
        }
    }
}

impl<R: Record> Default for ActionSet<R> {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER)
    }
}

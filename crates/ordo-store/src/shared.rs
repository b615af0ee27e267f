//! Shared collection - serialized access across threads
//!
//! Every action runs while holding the lock, so each one observes the
//! result of the one before it. Readers take a snapshot and release the
//! lock immediately.

use std::sync::Arc;

use ordo_core::{OrdoResult, Record};
use ordo_engine::Sequence;
use parking_lot::Mutex;

use crate::Collection;

/// Cloneable handle on a collection guarded by a mutex
pub struct SharedCollection<R: Record> {
    inner: Arc<Mutex<Collection<R>>>,
}

impl<R: Record> SharedCollection<R> {
    pub fn new(collection: Collection<R>) -> Self {
        SharedCollection {
            inner: Arc::new(Mutex::new(collection)),
        }
    }

    /// Run one or more actions as a single serialized step
    ///
    /// Actions that already succeeded inside `f` stay committed even if a
    /// later one fails.
    pub fn apply<T>(&self, f: impl FnOnce(&mut Collection<R>) -> OrdoResult<T>) -> OrdoResult<T> {
        let mut collection = self.inner.lock();
        f(&mut collection)
    }

    /// Read the collection under the lock
    pub fn read<T>(&self, f: impl FnOnce(&Collection<R>) -> T) -> T {
        let collection = self.inner.lock();
        f(&collection)
    }

    pub fn snapshot(&self) -> Sequence<R> {
        self.inner.lock().snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.inner.lock().revision()
    }
}

impl<R: Record> Clone for SharedCollection<R> {
    fn clone(&self) -> Self {
        SharedCollection {
            inner: Arc::clone(&self.inner),
        }
    }
}

//! Staging area for batched writes.
//!
//! A [`Transaction`] only exists inside [`JsonKv::transaction`](crate::JsonKv::transaction),
//! which holds the store's write lock for the whole batch. Nothing here does
//! I/O or locking; it just edits a private copy of the map.

use std::collections::HashMap;

/// Working copy of the store's map for the duration of one transaction.
///
/// Reads see earlier writes made through the same transaction. The copy is
/// swapped into the store only if the batch closure returns `Ok`.
pub struct Transaction<T> {
    data: HashMap<String, T>,
}

impl<T: Clone> Transaction<T> {
    pub(crate) fn new(data: HashMap<String, T>) -> Self {
        Self { data }
    }

    pub(crate) fn into_inner(self) -> HashMap<String, T> {
        self.data
    }

    /// Get the staged value for `key`, or `None` if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        self.data.get(key).cloned()
    }

    /// `true` if `key` is present in the working copy.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Stage `key -> value`, returning the previously staged value.
    pub fn set(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.data.insert(key.into(), value)
    }

    /// Stage removal of `key`. Absent keys are a no-op.
    pub fn delete(&mut self, key: &str) -> Option<T> {
        self.data.remove(key)
    }

    /// Stage removal of every entry.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of staged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snapshot of the staged keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }
}

impl<T> std::fmt::Debug for Transaction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("staged", &self.data.len())
            .finish()
    }
}

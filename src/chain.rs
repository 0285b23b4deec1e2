//! Owned key/value chain backing a single [`ChainedMap`](crate::ChainedMap) bucket.

use std::{slice, vec};

/// A key-value pair stored in a chain
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    /// The key in the key-value pair
    pub(crate) key: String,
    /// The value associated with the key
    pub(crate) value: V,
}

/// An ordered sequence of entries.
///
/// The chain does not enforce key uniqueness on its own; [`ChainedMap::put`](crate::ChainedMap::put)
/// checks for an existing entry before inserting.
#[derive(Debug, Clone)]
pub(crate) struct Chain<V> {
    /// Entries in insertion order
    entries: Vec<Entry<V>>,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> Chain<V> {
    /// Appends a new entry at the end of the chain
    pub(crate) fn insert(&mut self, key: String, value: V) {
        self.entries.push(Entry { key, value });
    }

    /// Returns the first entry whose key matches
    pub(crate) fn find(&self, key: &str) -> Option<&Entry<V>> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Returns the first entry whose key matches, mutably
    pub(crate) fn find_mut(&mut self, key: &str) -> Option<&mut Entry<V>> {
        self.entries.iter_mut().find(|entry| entry.key == key)
    }

    /// Unlinks the first entry whose key matches and returns its value.
    ///
    /// Remaining entries keep their relative order.
    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        let position = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.remove(position).value)
    }

    /// Iterates over the entries front to back
    pub(crate) fn iter(&self) -> slice::Iter<'_, Entry<V>> {
        self.entries.iter()
    }

    /// Number of entries in the chain
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain holds no entries
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for Chain<V> {
    type Item = Entry<V>;
    type IntoIter = vec::IntoIter<Entry<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

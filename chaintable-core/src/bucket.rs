//! Chain storage
//!
//! A bucket is an ordered chain of entries whose keys hash to the same
//! index. Keys are unique within a chain; new keys are appended.

use std::borrow::Borrow;

/// Key-value pair stored in a chain
///
/// The key is fixed once inserted, the value can be mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }

    /// Entry key
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Entry value
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable entry value
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Ordered chain of entries sharing a bucket index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn new() -> Self {
        Bucket { entries: Vec::new() }
    }

    /// Number of entries chained here
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in chain order
    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    /// Position of `key` in the chain (linear scan)
    pub(crate) fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|e| e.key.borrow() == key)
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().find(|e| e.key.borrow() == key)
    }

    pub(crate) fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter_mut().find(|e| e.key.borrow() == key)
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&Entry<K, V>> {
        self.entries.get(slot)
    }

    pub(crate) fn entry_mut(&mut self, slot: usize) -> &mut Entry<K, V> {
        &mut self.entries[slot]
    }

    /// Append an entry; caller guarantees the key is not already chained
    pub(crate) fn push(&mut self, entry: Entry<K, V>) -> &mut Entry<K, V> {
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Remove the entry at `slot`, preserving the order of the rest
    pub(crate) fn remove(&mut self, slot: usize) -> Entry<K, V> {
        self.entries.remove(slot)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }

    pub(crate) fn into_entries(self) -> std::vec::IntoIter<Entry<K, V>> {
        self.entries.into_iter()
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

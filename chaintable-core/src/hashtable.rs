//! Generic separate-chaining hash table
//!
//! Provides:
//! - Power-of-two bucket array, index = `hash & (capacity - 1)`
//! - Automatic doubling/halving driven by lower/upper load factors
//! - Full rehash by moving entries into a fresh bucket array
//! - Layout-sensitive equality plus layout-independent comparison helpers

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};

use log::{debug, warn};
use xxhash_rust::xxh3::Xxh3Builder;

use crate::bucket::{Bucket, Entry};
use crate::config::{LoadFactors, DEFAULT_CAPACITY};
use crate::digest::ContentDigest;
use crate::error::{Result, TableError};
use crate::iter::{Cursor, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// Resizable hash table with separate chaining
///
/// Capacity (the bucket count) is always a power of two and at least 1.
/// After a new key is inserted, `len / capacity <= upper`. After a key
/// is removed, the table halves until `len / capacity >= lower` or until
/// halving again would overshoot `upper`.
///
/// References handed out by [`at_mut`](Self::at_mut),
/// [`get_or_insert_default`](Self::get_or_insert_default) and the
/// iterators borrow the table, so the borrow checker rejects any
/// structural mutation while they are alive.
#[derive(Clone)]
pub struct ChainedHashTable<K, V, S = Xxh3Builder> {
    /// Bucket array, length is the capacity
    pub(crate) buckets: Vec<Bucket<K, V>>,

    /// Number of live entries
    pub(crate) len: usize,

    /// Resize thresholds
    pub(crate) load_factors: LoadFactors,

    /// Hasher factory
    pub(crate) hasher: S,
}

/// Snapshot of chain-length statistics
#[derive(Clone, Debug, PartialEq)]
pub struct TableStats {
    pub len: usize,
    pub capacity: usize,
    pub load_factor: f64,
    /// Buckets holding no entries
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// (chain length, number of buckets with that length), ascending
    pub chain_histogram: Vec<(usize, usize)>,
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    (0..capacity).map(|_| Bucket::new()).collect()
}

impl<K, V> ChainedHashTable<K, V, Xxh3Builder> {
    /// Create an empty table with default capacity and thresholds
    pub fn new() -> Self {
        Self::with_hasher(Xxh3Builder::new())
    }

    /// Create an empty table with custom thresholds
    ///
    /// Fails with [`TableError::InvalidThresholds`] unless `0 < lower < upper < 1`.
    pub fn with_load_factors(lower: f64, upper: f64) -> Result<Self> {
        let load_factors = LoadFactors::new(lower, upper)?;
        Ok(Self::with_capacity_and_load_factors(DEFAULT_CAPACITY, load_factors))
    }

    /// Create an empty table
    ///
    /// # Arguments
    /// * `capacity` - Initial bucket count, rounded up to a power of two (minimum 1)
    /// * `load_factors` - Resize thresholds
    pub fn with_capacity_and_load_factors(capacity: usize, load_factors: LoadFactors) -> Self {
        Self::with_capacity_load_factors_and_hasher(capacity, load_factors, Xxh3Builder::new())
    }

    /// Build a table from parallel key and value sequences with default thresholds
    ///
    /// Pairs are inserted in order, so a later duplicate key overwrites an
    /// earlier one.
    pub fn from_keys_values(keys: Vec<K>, values: Vec<V>) -> Result<Self>
    where
        K: Hash + Eq,
    {
        Self::from_keys_values_with_load_factors(keys, values, LoadFactors::default())
    }

    /// Build a table from parallel key and value sequences
    ///
    /// Fails with [`TableError::LengthMismatch`] if the lengths differ.
    pub fn from_keys_values_with_load_factors(
        keys: Vec<K>,
        values: Vec<V>,
        load_factors: LoadFactors,
    ) -> Result<Self>
    where
        K: Hash + Eq,
    {
        if keys.len() != values.len() {
            warn!(
                "Bulk construction with {} keys and {} values",
                keys.len(),
                values.len()
            );
            return Err(TableError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        let mut table = Self::with_capacity_and_load_factors(DEFAULT_CAPACITY, load_factors);
        table.extend(keys.into_iter().zip(values));
        Ok(table)
    }
}

impl<K, V, S> ChainedHashTable<K, V, S> {
    /// Create an empty table with default capacity and thresholds using `hasher`
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_load_factors_and_hasher(DEFAULT_CAPACITY, LoadFactors::default(), hasher)
    }

    /// Create an empty table with every knob specified
    pub fn with_capacity_load_factors_and_hasher(
        capacity: usize,
        load_factors: LoadFactors,
        hasher: S,
    ) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        ChainedHashTable {
            buckets: empty_buckets(capacity),
            len: 0,
            load_factors,
            hasher,
        }
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias of [`len`](Self::len)
    pub fn size(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get bucket count
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Get load factor (`len / capacity`)
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Get resize thresholds
    pub fn load_factors(&self) -> LoadFactors {
        self.load_factors
    }

    /// Get the hasher factory
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Bucket array in index order (for introspection)
    pub fn buckets(&self) -> &[Bucket<K, V>] {
        &self.buckets
    }

    /// Remove every entry. Capacity is left unchanged.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Bucket::clear);
        self.len = 0;
    }

    /// Iterate over all entries in bucket order
    ///
    /// Order is unspecified and changes across resizes. Each call starts
    /// a fresh pass.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, self.len)
    }

    /// Iterate with mutable access to values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.buckets, self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Cursor positioned at the first entry
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.buckets)
    }

    /// Chain-length statistics
    pub fn stats(&self) -> TableStats {
        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        for bucket in &self.buckets {
            *histogram.entry(bucket.len()).or_insert(0) += 1;
        }

        TableStats {
            len: self.len,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            empty_buckets: histogram.get(&0).copied().unwrap_or(0),
            longest_chain: histogram.keys().next_back().copied().unwrap_or(0),
            chain_histogram: histogram.into_iter().collect(),
        }
    }
}

impl<K, V, S> ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Bucket index for a key under the current capacity
    #[inline]
    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(key) as usize) & (self.buckets.len() - 1)
    }

    /// Insert key-value pair
    ///
    /// Returns true if the key was new. An existing key has its value
    /// overwritten and false is returned; overwrites never resize.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let index = self.bucket_index(&key);
        if let Some(entry) = self.buckets[index].find_mut(&key) {
            entry.value = value;
            return false;
        }

        self.push_new(key, value);
        true
    }

    /// Get mutable value by key, inserting `V::default()` if absent
    ///
    /// A new entry goes through the same growth check as [`insert`](Self::insert).
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let index = self.bucket_index(&key);
        if let Some(slot) = self.buckets[index].position(&key) {
            return &mut self.buckets[index].entry_mut(slot).value;
        }

        self.push_new(key, V::default())
    }

    /// Append a key known to be absent, growing first if needed
    fn push_new(&mut self, key: K, value: V) -> &mut V {
        self.grow_for_insert();
        let index = self.bucket_index(&key);
        self.len += 1;
        &mut self.buckets[index].push(Entry::new(key, value)).value
    }

    /// Check if key is present (scans one chain)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Get value by key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index].find(key).map(|entry| &entry.value)
    }

    /// Get mutable value by key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index].find_mut(key).map(|entry| &mut entry.value)
    }

    /// Get value by key, failing with [`TableError::KeyNotFound`] if absent
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(TableError::KeyNotFound)
    }

    /// Get mutable value by key, failing with [`TableError::KeyNotFound`] if absent
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(TableError::KeyNotFound)
    }

    /// Remove key, returning its value
    ///
    /// Shrinks the table if the load factor drops below the lower threshold.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let slot = self.buckets[index].position(key)?;
        let entry = self.buckets[index].remove(slot);
        self.len -= 1;
        self.shrink_after_remove();
        Some(entry.value)
    }

    /// Remove key. Returns false if it was absent.
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Number of entries chained in the bucket holding `key`
    ///
    /// Fails with [`TableError::KeyNotFound`] if the key is absent.
    pub fn bucket_size<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = &self.buckets[self.bucket_index(key)];
        match bucket.position(key) {
            Some(_) => Ok(bucket.len()),
            None => Err(TableError::KeyNotFound),
        }
    }

    /// Compare logical contents, ignoring capacity, thresholds and chain order
    pub fn same_entries<S2>(&self, other: &ChainedHashTable<K, V, S2>) -> bool
    where
        V: PartialEq,
        S2: BuildHasher,
    {
        self.len == other.len
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }

    /// Order-independent digest of all entries
    ///
    /// Tables holding the same pairs digest identically whatever their
    /// layout or insertion history.
    pub fn content_digest(&self) -> ContentDigest
    where
        V: Hash,
    {
        ContentDigest::from_digests(
            self.iter()
                .map(|(key, value)| ContentDigest::hash_entry(key, value)),
        )
    }

    /// Double capacity until one more entry fits under the upper threshold
    fn grow_for_insert(&mut self) {
        let mut target = self.capacity();
        while self.load_factors.exceeds_upper(self.len + 1, target) {
            target *= 2;
        }
        if target != self.capacity() {
            self.rehash(target);
        }
    }

    /// Halve capacity while under the lower threshold
    ///
    /// Stops at capacity 1 and never halves into a layout that would
    /// exceed the upper threshold.
    fn shrink_after_remove(&mut self) {
        let mut target = self.capacity();
        while target > 1
            && self.load_factors.below_lower(self.len, target)
            && !self.load_factors.exceeds_upper(self.len, target / 2)
        {
            target /= 2;
        }
        if target != self.capacity() {
            self.rehash(target);
        }
    }

    /// Move every entry into a fresh bucket array of `new_capacity`
    fn rehash(&mut self, new_capacity: usize) {
        debug!(
            "Rehashing {} entries: {} -> {} buckets",
            self.len,
            self.capacity(),
            new_capacity
        );

        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for bucket in old {
            for entry in bucket.into_entries() {
                let index = self.bucket_index(&entry.key);
                self.buckets[index].push(entry);
            }
        }
    }
}

impl<K, V> Default for ChainedHashTable<K, V, Xxh3Builder> {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout-sensitive equality
///
/// Two tables are equal only if length, capacity, both thresholds and
/// every bucket (chain order included) match. Tables with the same
/// logical pairs but a different capacity or insertion history compare
/// unequal; use [`ChainedHashTable::same_entries`] for content equality.
impl<K, V, S> PartialEq for ChainedHashTable<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.capacity() == other.capacity()
            && self.load_factors == other.load_factors
            && self.buckets == other.buckets
    }
}

impl<K: Debug, V: Debug, S> Debug for ChainedHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

impl<K, V, S> IntoIterator for ChainedHashTable<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.buckets, self.len)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashTable<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

//! Iteration over chained entries
//!
//! [`Cursor`] is the single forward-only position in a bucket array.
//! The bucket/slot pair it tracks is internal; callers only see
//! advance, dereference and equality. The iterator types are thin
//! wrappers that also carry an exact remaining count.
//!
//! Order is bucket order, then chain order within a bucket. It is not
//! a total order over keys and changes whenever the table resizes.

use std::fmt;
use std::iter::FusedIterator;

use crate::bucket::{Bucket, Entry};

/// Forward-only position over a bucket array
///
/// A cursor borrows the buckets it walks, so the table cannot be
/// structurally mutated while it is alive. Two cursors compare equal
/// when they walk the same bucket array and sit on the same entry; all
/// exhausted cursors over the same array are equal.
pub struct Cursor<'a, K, V> {
    buckets: &'a [Bucket<K, V>],
    bucket: usize,
    slot: usize,
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Cursor at the first entry, or at the end if there are none
    pub(crate) fn new(buckets: &'a [Bucket<K, V>]) -> Self {
        let mut cursor = Cursor {
            buckets,
            bucket: 0,
            slot: 0,
        };
        cursor.settle();
        cursor
    }

    /// Skip forward until positioned on an entry or past the last bucket
    fn settle(&mut self) {
        while self.bucket < self.buckets.len() && self.slot >= self.buckets[self.bucket].len() {
            self.bucket += 1;
            self.slot = 0;
        }
    }

    /// Move to the next entry. No-op at the end.
    pub fn advance(&mut self) {
        if self.is_end() {
            return;
        }
        self.slot += 1;
        self.settle();
    }

    /// Entry under the cursor, `None` at the end
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        let buckets = self.buckets;
        buckets
            .get(self.bucket)
            .and_then(|bucket| bucket.get(self.slot))
            .map(|entry| (&entry.key, &entry.value))
    }

    /// True once every entry has been passed
    pub fn is_end(&self) -> bool {
        self.bucket >= self.buckets.len()
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            buckets: self.buckets,
            bucket: self.bucket,
            slot: self.slot,
        }
    }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.buckets, other.buckets)
            && ((self.is_end() && other.is_end())
                || (self.bucket == other.bucket && self.slot == other.slot))
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("bucket", &self.bucket)
            .field("slot", &self.slot)
            .field("end", &self.is_end())
            .finish()
    }
}

/// Borrowing iterator over `(&K, &V)`
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Bucket<K, V>], len: usize) -> Self {
        Iter {
            cursor: Cursor::new(buckets),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.get()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

/// Borrowing iterator over `(&K, &mut V)`
///
/// Keys stay immutable; only values can be changed through it.
pub struct IterMut<'a, K, V> {
    buckets: std::slice::IterMut<'a, Bucket<K, V>>,
    chain: Option<std::slice::IterMut<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(buckets: &'a mut [Bucket<K, V>], len: usize) -> Self {
        IterMut {
            buckets: buckets.iter_mut(),
            chain: None,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(|chain| chain.next()) {
                self.remaining -= 1;
                let Entry { key, value } = entry;
                return Some((&*key, value));
            }
            self.chain = Some(self.buckets.next()?.iter_mut());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)`
pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Bucket<K, V>>,
    chain: Option<std::vec::IntoIter<Entry<K, V>>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(buckets: Vec<Bucket<K, V>>, len: usize) -> Self {
        IntoIter {
            buckets: buckets.into_iter(),
            chain: None,
            remaining: len,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(|chain| chain.next()) {
                self.remaining -= 1;
                return Some(entry.into_pair());
            }
            self.chain = Some(self.buckets.next()?.into_entries());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Iterator over keys
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over values
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Iterator over mutable values
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

//! Order-independent content digests
//!
//! Provides:
//! - BLAKE3 hash per entry, fed through the entry's `Hash` impl
//! - XOR combination so bucket layout and chain order do not matter
//! - O(1) comparison of logical table contents

use std::hash::{Hash, Hasher};

/// 32-byte BLAKE3 digest
pub type DigestBytes = [u8; 32];

/// Digest over a set of entries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    /// XOR of all entry digests
    root: DigestBytes,

    /// Number of entries folded in
    count: usize,
}

/// Adapts a BLAKE3 hasher to `std::hash::Hasher` so any `Hash` type can be digested
struct Blake3Writer(blake3::Hasher);

impl Hasher for Blake3Writer {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(&self) -> u64 {
        let hash = self.0.finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(prefix)
    }
}

impl ContentDigest {
    /// Digest of no entries
    pub fn empty() -> Self {
        ContentDigest {
            root: [0u8; 32],
            count: 0,
        }
    }

    /// Fold entry digests together (commutative)
    pub fn from_digests<I>(digests: I) -> Self
    where
        I: IntoIterator<Item = DigestBytes>,
    {
        let mut root = [0u8; 32];
        let mut count = 0;

        for digest in digests {
            for (acc, byte) in root.iter_mut().zip(digest.iter()) {
                *acc ^= byte;
            }
            count += 1;
        }

        ContentDigest { root, count }
    }

    /// Hash a single key-value pair
    pub fn hash_entry<K: Hash + ?Sized, V: Hash + ?Sized>(key: &K, value: &V) -> DigestBytes {
        let mut writer = Blake3Writer(blake3::Hasher::new());
        key.hash(&mut writer);
        value.hash(&mut writer);
        *writer.0.finalize().as_bytes()
    }

    /// Combined digest bytes
    pub fn root(&self) -> &DigestBytes {
        &self.root
    }

    /// Number of entries digested
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Default for ContentDigest {
    fn default() -> Self {
        Self::empty()
    }
}

//! Chained hash table - resizable separate-chaining map
//!
//! Core library providing:
//! - Power-of-two bucket array with bitmask indexing
//! - Load-factor driven doubling and halving with full rehash
//! - Forward-only cursor and iterators over chains
//! - Order-independent content digests for layout-free comparison
//!
//! The table is single-threaded. It is `Send`/`Sync` whenever its
//! key, value and hasher types are, but carries no internal locking.

pub mod bucket;
pub mod config;
pub mod digest;
pub mod error;
pub mod hashtable;
pub mod iter;

pub use bucket::{Bucket, Entry};
pub use config::{LoadFactors, DEFAULT_CAPACITY, DEFAULT_LOWER_LOAD_FACTOR, DEFAULT_UPPER_LOAD_FACTOR};
pub use digest::ContentDigest;
pub use error::{Result, TableError};
pub use hashtable::{ChainedHashTable, TableStats};
pub use iter::{Cursor, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

#[cfg(test)]
mod tests;

//! Error taxonomy for table construction and keyed access

use thiserror::Error;

/// Errors surfaced by [`ChainedHashTable`](crate::ChainedHashTable)
///
/// All variants are contract violations reported synchronously at the
/// offending call. Nothing in the table performs I/O, so there is no
/// retry story.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// Thresholds must satisfy `0 < lower < upper < 1`
    #[error("invalid load factor thresholds: lower={lower}, upper={upper} (need 0 < lower < upper < 1)")]
    InvalidThresholds { lower: f64, upper: f64 },

    /// Bulk construction was given sequences of different lengths
    #[error("key/value length mismatch: {keys} keys, {values} values")]
    LengthMismatch { keys: usize, values: usize },

    /// Keyed access on an absent key
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, TableError>;

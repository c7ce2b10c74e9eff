//! Load factor thresholds and table defaults

use crate::error::{Result, TableError};

/// Bucket count of a freshly constructed table
pub const DEFAULT_CAPACITY: usize = 16;

/// Shrink when `len / capacity` drops below this
pub const DEFAULT_LOWER_LOAD_FACTOR: f64 = 0.25;

/// Grow when `len / capacity` would exceed this
pub const DEFAULT_UPPER_LOAD_FACTOR: f64 = 0.75;

/// Validated pair of resize thresholds
///
/// Always satisfies `0 < lower < upper < 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadFactors {
    lower: f64,
    upper: f64,
}

impl LoadFactors {
    /// Create a threshold pair
    ///
    /// # Arguments
    /// * `lower` - Shrink threshold, exclusive lower bound 0
    /// * `upper` - Grow threshold, exclusive upper bound 1
    ///
    /// Fails with [`TableError::InvalidThresholds`] otherwise (NaN included).
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        // Comparisons against NaN are false, so NaN falls through to the error
        if 0.0 < lower && lower < upper && upper < 1.0 {
            Ok(LoadFactors { lower, upper })
        } else {
            log::warn!("Rejected load factors lower={} upper={}", lower, upper);
            Err(TableError::InvalidThresholds { lower, upper })
        }
    }

    /// Shrink threshold
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Grow threshold
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// True if `len` entries over `capacity` buckets exceeds the upper bound
    #[inline]
    pub(crate) fn exceeds_upper(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 > self.upper
    }

    /// True if `len` entries over `capacity` buckets is under the lower bound
    #[inline]
    pub(crate) fn below_lower(&self, len: usize, capacity: usize) -> bool {
        (len as f64 / capacity as f64) < self.lower
    }
}

impl Default for LoadFactors {
    fn default() -> Self {
        LoadFactors {
            lower: DEFAULT_LOWER_LOAD_FACTOR,
            upper: DEFAULT_UPPER_LOAD_FACTOR,
        }
    }
}

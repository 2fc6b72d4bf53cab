//! Resize thresholds and the grow/shrink decision.

use crate::error::TableError;

/// Per-table resize policy.
///
/// After every insert and every successful removal the table computes
/// `load = len / capacity` and asks [`TableConfig::resize_target`] whether
/// to rebuild:
/// - `load > max_load_factor` doubles the capacity;
/// - `load < min_load_factor` halves it, never going below `min_size`;
/// - anything in between leaves the table alone.
///
/// A band that is too narrow (`max_load_factor < 2 * min_load_factor`) may
/// rebuild on alternating insert/remove at the boundary. That is allowed but
/// slow.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Capacity floor for shrinking.
    pub min_size: usize,
    /// Shrink when `len / capacity` drops strictly below this.
    pub min_load_factor: f64,
    /// Grow when `len / capacity` rises strictly above this.
    pub max_load_factor: f64,
}

impl TableConfig {
    /// Default capacity floor.
    pub const DEFAULT_MIN_SIZE: usize = 8;
    /// Default shrink threshold.
    pub const DEFAULT_MIN_LOAD_FACTOR: f64 = 0.1;
    /// Default grow threshold.
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 1.0;

    pub fn validate(&self) -> Result<(), TableError> {
        if self.min_size == 0 {
            return Err(TableError::InvalidConfig("min_size must be at least 1"));
        }
        if !self.min_load_factor.is_finite() || !self.max_load_factor.is_finite() {
            return Err(TableError::InvalidConfig("load factors must be finite"));
        }
        if self.min_load_factor <= 0.0 {
            return Err(TableError::InvalidConfig(
                "min_load_factor must be greater than zero",
            ));
        }
        if self.min_load_factor >= self.max_load_factor {
            return Err(TableError::InvalidConfig(
                "min_load_factor must be below max_load_factor",
            ));
        }
        Ok(())
    }

    /// Capacity the table should be rebuilt at, or `None` to keep the
    /// current one. `capacity` must be non-zero.
    pub fn resize_target(&self, len: usize, capacity: usize) -> Option<usize> {
        let load = len as f64 / capacity as f64;
        if load > self.max_load_factor {
            Some(capacity.saturating_mul(2))
        } else if load < self.min_load_factor && capacity > self.min_size {
            Some(self.min_size.max(capacity / 2))
        } else {
            None
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_size: Self::DEFAULT_MIN_SIZE,
            min_load_factor: Self::DEFAULT_MIN_LOAD_FACTOR,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

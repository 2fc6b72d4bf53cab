//! Error type shared by every fallible table operation.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure of a table operation. A failed operation leaves the table as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table was created with zero slots.
    #[error("initial capacity must be greater than zero")]
    InvalidCapacity,
    /// The resize thresholds or the capacity floor were rejected.
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
    /// The slot array or a key copy could not be allocated.
    #[error("out of memory")]
    OutOfMemory(#[from] TryReserveError),
}

//! Errors surfaced by table construction and insertion.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// A slot array of `capacity` cells could not be allocated.
    #[error("could not allocate a slot array of {capacity} cells")]
    AllocationFailed {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    /// Growing would pass the configured maximum capacity.
    #[error("growing past the configured maximum of {limit} cells is not allowed")]
    CapacityLimit { limit: usize },

    /// A new key found no free cell; growth was refused earlier.
    #[error("no free cell for a new key at capacity {capacity}")]
    Full { capacity: usize },

    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}

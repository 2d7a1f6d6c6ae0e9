//! Allocation error types.
//!
//! Every fallible operation in the loam crates reports one of these
//! variants and leaves the structure it was called on in its prior valid
//! state, so callers can recover or retry.

use std::error::Error;
use std::fmt;

/// Errors from allocation hooks and the structures built on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The underlying allocator declined the request.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// A hooks-level byte budget would be exceeded.
    QuotaExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still admissible under the budget.
        available: usize,
    },
    /// A structural limit would be exceeded, such as the addressable size
    /// of a single arena allocation or a container's entry index range.
    CapacityExceeded {
        /// Size of the rejected request, in bytes or entries.
        requested: usize,
        /// The limit the request ran into.
        limit: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: {requested} bytes requested")
            }
            Self::QuotaExceeded {
                requested,
                available,
            } => {
                write!(
                    f,
                    "allocation quota exceeded: requested {requested} bytes, {available} available"
                )
            }
            Self::CapacityExceeded { requested, limit } => {
                write!(f, "capacity exceeded: requested {requested}, limit {limit}")
            }
        }
    }
}

impl Error for AllocError {}

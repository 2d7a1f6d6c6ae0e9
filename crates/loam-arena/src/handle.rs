//! Allocation handles.
//!
//! An [`ArenaHandle`] names one allocation inside an arena: which chunk
//! it landed in, at what offset, how long it is, and the reset epoch it
//! belongs to. The generation stamp makes staleness detection O(1):
//! after a reset, handles minted in earlier epochs are rejected instead
//! of silently aliasing recycled memory.

use std::fmt;

/// Location of a single allocation within an arena.
///
/// Handles are plain copyable values and carry no lifetime. They stay
/// meaningful until the owning arena is reset or dropped; resolving one
/// back to bytes goes through the arena, which checks the generation
/// stamp first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct ArenaHandle {
    /// Arena generation at the time of allocation.
    pub(crate) generation: u32,
    /// Index of the chunk holding the allocation.
    pub(crate) chunk: u32,
    /// Byte offset within that chunk.
    pub(crate) offset: u32,
    /// Length of the allocation in bytes, after alignment rounding.
    pub(crate) len: u32,
}

impl ArenaHandle {
    /// Create a new handle.
    pub(crate) fn new(generation: u32, chunk: u32, offset: u32, len: u32) -> Self {
        Self {
            generation,
            chunk,
            offset,
            len,
        }
    }

    /// The reset epoch this handle was minted in.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Index of the chunk holding the allocation.
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    /// Byte offset within the chunk.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length of the allocation in bytes, after alignment rounding.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the handle names an empty region. Never true for handles
    /// minted by an arena, which rejects zero-sized requests.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for ArenaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArenaHandle(gen={}, chunk={}, off={}, len={})",
            self.generation, self.chunk, self.offset, self.len
        )
    }
}

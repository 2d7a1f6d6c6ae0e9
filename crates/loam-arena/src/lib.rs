//! Chunked bump allocation for the loam memory substrate.
//!
//! The [`Arena`] hands out aligned byte regions named by
//! generation-stamped [`ArenaHandle`]s. Allocation is O(1): bump the
//! cursor of the live chunk, or open a new window from the free cache
//! or the [`AllocHooks`](loam_core::AllocHooks). Nothing is freed
//! piecemeal; [`Arena::reset`] retires every allocation at once and
//! parks the spent chunks for the next round, which is what gives the
//! allocate-use-reset-repeat pattern its speed.
//!
//! # Architecture
//!
//! ```text
//! Arena<H>
//! ├── chunks: Vec<Chunk>          last entry is the live bump window
//! ├── free_cache: SmallVec<...>   spent chunks parked by reset
//! └── hooks: H: AllocHooks        source and sink of all chunk storage
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
mod chunk;
pub mod config;
pub mod handle;

// Public re-exports for the primary API surface.
pub use arena::{Arena, MAX_ALIGN, MAX_ALLOC_BYTES};
pub use config::ArenaConfig;
pub use handle::ArenaHandle;

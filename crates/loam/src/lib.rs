//! Loam: arena allocation and hash-chained containers over pluggable
//! allocator hooks.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//!
//! // A scratch arena for one round of work.
//! let mut arena = Arena::new();
//! let greeting = arena.alloc(5)?;
//! arena.bytes_mut(greeting)[..5].copy_from_slice(b"hello");
//! assert_eq!(&arena.bytes(greeting)[..5], b"hello");
//!
//! // An index sized for about a hundred entries.
//! let mut index = ChainMap::new(100);
//! index.insert("hello".to_string(), greeting)?;
//! assert_eq!(index.get(&"hello".to_string()), Some(&greeting));
//!
//! // Retire the round: one reset invalidates every handle at once.
//! arena.reset();
//! assert_eq!(arena.used_bytes(), 0);
//! # Ok::<(), AllocError>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `loam-arena` | Chunked bump arena, configs, handles |
//! | [`containers`] | `loam-containers` | Hash-chained map and set |
//! | [`types`] | `loam-core` | Hooks, errors, diagnostics, key capabilities |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Chunked bump arena storage (`loam-arena`).
///
/// Most users only need [`arena::Arena`] and [`arena::ArenaHandle`]
/// from this module; they are also available in the [`prelude`].
pub use loam_arena as arena;

/// Hash-chained map and set (`loam-containers`).
///
/// [`containers::ChainMap`] and [`containers::ChainSet`] share a
/// slab-and-chains layout with a bucket count fixed at creation.
pub use loam_containers as containers;

/// Shared substrate (`loam-core`).
///
/// Contains the [`types::AllocHooks`] capability with its
/// [`types::HeapHooks`] and [`types::QuotaHooks`] implementations,
/// error types, the [`types::MsgStack`] diagnostic buffer, and the
/// [`types::KeyOps`] hashing capability.
pub use loam_core as types;

/// Common imports for typical loam usage.
///
/// ```rust
/// use loam::prelude::*;
/// ```
///
/// This imports the most frequently used types: the arena, both
/// containers, the allocation hooks with their stock implementations,
/// and the error type.
pub mod prelude {
    // Arena storage
    pub use loam_arena::{Arena, ArenaConfig, ArenaHandle};

    // Containers
    pub use loam_containers::{ChainMap, ChainSet};

    // Allocation hooks and policy decorators
    pub use loam_core::{AllocError, AllocHooks, HeapHooks, QuotaHooks};

    // Diagnostics
    pub use loam_core::{MsgStack, RecordingHooks};

    // Key capabilities
    pub use loam_core::{KeyOps, StdKeyOps};
}

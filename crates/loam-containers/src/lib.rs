//! Hash-chained containers for the loam memory substrate.
//!
//! [`ChainMap`] and [`ChainSet`] share one storage shape: entries live
//! in a single slab and buckets hold 32-bit slab indices, with
//! collisions resolved by chaining through the slab. The bucket count
//! is fixed at creation from a capacity hint rounded up a prime
//! ladder; neither container rehashes or removes individual entries,
//! so load beyond the hint is absorbed by longer chains. A set that
//! outgrows its hint is rebuilt through
//! [`ChainSet::copy_with_hint`].
//!
//! Hashing and equality are pluggable through the
//! [`KeyOps`](loam_core::KeyOps) capability, and all backing storage
//! flows through [`AllocHooks`](loam_core::AllocHooks), so quota and
//! instrumentation decorators see every byte the containers hold.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod map;
mod prime;
pub mod set;

// Public re-exports for the primary API surface.
pub use map::ChainMap;
pub use set::ChainSet;

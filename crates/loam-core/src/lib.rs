//! Shared substrate for the loam allocation and container crates.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! pluggable allocation capability ([`AllocHooks`]) with its heap default
//! and decorators, the error type every fallible operation reports, the
//! caller-owned diagnostic message stack, and the key hashing/equality
//! capability the containers are parameterized by.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diag;
pub mod error;
pub mod hooks;
pub mod key;

// Public re-exports for the primary API surface.
pub use diag::{MsgStack, RecordingHooks};
pub use error::AllocError;
pub use hooks::{AllocHooks, HeapHooks, QuotaHooks};
pub use key::{KeyOps, StdKeyOps};

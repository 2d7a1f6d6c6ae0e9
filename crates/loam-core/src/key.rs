//! Key hashing and equality capability.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hashing and equality operations supplied to the chained containers.
///
/// Implemented by small strategy values rather than bare function
/// pointers, so a container carries its scheme as a type parameter and
/// dispatches statically. Consistency contract: keys equal under
/// [`eq`](Self::eq) must produce identical [`hash`](Self::hash) values.
pub trait KeyOps<K> {
    /// Hash `key` for bucket selection.
    fn hash(&self, key: &K) -> u64;

    /// Whether `a` and `b` are the same key.
    fn eq(&self, a: &K, b: &K) -> bool;
}

/// The default [`KeyOps`], delegating to `Hash` and `Eq`.
///
/// Uses the standard library's `DefaultHasher` with its fixed initial
/// state, so hash values are reproducible within a process run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StdKeyOps;

impl<K: Hash + Eq> KeyOps<K> for StdKeyOps {
    fn hash(&self, key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

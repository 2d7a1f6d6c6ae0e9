//! Benchmark workloads and utilities for the loam memory substrate.
//!
//! Provides deterministic workload builders shared by the benches:
//!
//! - [`alloc_sizes`]: seeded allocation-size sequences
//! - [`string_keys`]: seeded, distinct string keys
//! - [`overlapping_keys`]: two key sets with a controlled overlap

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `count` allocation sizes in `1..=max`, deterministically
/// from `seed`.
pub fn alloc_sizes(count: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(1..=max)).collect()
}

/// Generate `count` distinct string keys, deterministically from
/// `seed`.
///
/// Keys carry a random prefix so hash distribution resembles real
/// identifiers rather than a dense integer range.
pub fn string_keys(count: usize, seed: u64) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|index| format!("{:08x}-{index}", rng.random::<u32>()))
        .collect()
}

/// Generate two key sets of `count` keys each, where the second set
/// repeats `overlap` keys from the first. Deterministic in `seed`.
pub fn overlapping_keys(count: usize, overlap: usize, seed: u64) -> (Vec<String>, Vec<String>) {
    assert!(overlap <= count, "overlap cannot exceed count");
    let first = string_keys(count, seed);
    let mut second = string_keys(count - overlap, seed ^ 0x9e37_79b9_7f4a_7c15);
    second.extend(first.iter().take(overlap).cloned());
    (first, second)
}

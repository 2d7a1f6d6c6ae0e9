//! Criterion micro-benchmarks for arena allocation and reset cycles.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loam_arena::{Arena, ArenaConfig};
use loam_bench::alloc_sizes;
use loam_core::QuotaHooks;
use loam_test_utils::CountingHooks;

/// Benchmark: a full allocate-reset round of 1000 mixed-size requests
/// in steady state, so every chunk comes from the free cache.
fn bench_alloc_reset_cycle(c: &mut Criterion) {
    let sizes = alloc_sizes(1000, 256, 42);
    let mut arena = Arena::new();
    c.bench_function("arena_alloc_reset_1000", |b| {
        b.iter(|| {
            for &size in &sizes {
                black_box(arena.alloc(size).unwrap());
            }
            arena.reset();
        });
    });
}

/// Benchmark: the same round through a quota decorator, to price the
/// admission bookkeeping.
fn bench_alloc_reset_quota(c: &mut Criterion) {
    let sizes = alloc_sizes(1000, 256, 42);
    let mut arena = Arena::with_hooks(ArenaConfig::new(), QuotaHooks::new(usize::MAX));
    c.bench_function("arena_alloc_reset_1000_quota", |b| {
        b.iter(|| {
            for &size in &sizes {
                black_box(arena.alloc(size).unwrap());
            }
            arena.reset();
        });
    });
}

/// Benchmark: the same round through a counting decorator.
fn bench_alloc_reset_counting(c: &mut Criterion) {
    let sizes = alloc_sizes(1000, 256, 42);
    let mut arena = Arena::with_hooks(ArenaConfig::new(), CountingHooks::new());
    c.bench_function("arena_alloc_reset_1000_counting", |b| {
        b.iter(|| {
            for &size in &sizes {
                black_box(arena.alloc(size).unwrap());
            }
            arena.reset();
        });
    });
}

/// Benchmark: first allocation of a cold arena, including the chunk
/// grab from the heap.
fn bench_cold_first_alloc(c: &mut Criterion) {
    c.bench_function("arena_cold_first_alloc", |b| {
        b.iter(|| {
            let mut arena = Arena::new();
            black_box(arena.alloc(64).unwrap());
        });
    });
}

/// Benchmark: allocate a 4 KiB region and fill it through the handle.
fn bench_write_through_handle(c: &mut Criterion) {
    let mut arena = Arena::new();
    c.bench_function("arena_write_4k", |b| {
        b.iter(|| {
            let handle = arena.alloc(4096).unwrap();
            arena.bytes_mut(handle).fill(0x5A);
            black_box(arena.bytes(handle)[0]);
            arena.reset();
        });
    });
}

/// Benchmark: zeroed allocation of 64 records of 16 bytes.
fn bench_zero_alloc(c: &mut Criterion) {
    let mut arena = Arena::new();
    c.bench_function("arena_zero_alloc_64x16", |b| {
        b.iter(|| {
            let handle = arena.zero_alloc(64, 16).unwrap();
            black_box(arena.bytes(handle)[0]);
            arena.reset();
        });
    });
}

criterion_group!(
    benches,
    bench_alloc_reset_cycle,
    bench_alloc_reset_quota,
    bench_alloc_reset_counting,
    bench_cold_first_alloc,
    bench_write_through_handle,
    bench_zero_alloc
);
criterion_main!(benches);

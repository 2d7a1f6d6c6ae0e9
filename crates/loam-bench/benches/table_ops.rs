//! Criterion micro-benchmarks for the chained containers, with the
//! standard library and indexmap as baselines.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use loam_bench::{overlapping_keys, string_keys};
use loam_containers::{ChainMap, ChainSet};

/// Benchmark: insert 1000 distinct string keys into a map sized for
/// them, against the std and indexmap baselines.
fn bench_map_insert(c: &mut Criterion) {
    let keys = string_keys(1000, 7);

    c.bench_function("chain_map_insert_1000", |b| {
        b.iter(|| {
            let mut map = ChainMap::new(1000);
            for (index, key) in keys.iter().enumerate() {
                map.insert(key.clone(), index).unwrap();
            }
            black_box(map.len());
        });
    });

    c.bench_function("std_hash_map_insert_1000", |b| {
        b.iter(|| {
            let mut map = HashMap::with_capacity(1000);
            for (index, key) in keys.iter().enumerate() {
                map.insert(key.clone(), index);
            }
            black_box(map.len());
        });
    });

    c.bench_function("index_map_insert_1000", |b| {
        b.iter(|| {
            let mut map = IndexMap::with_capacity(1000);
            for (index, key) in keys.iter().enumerate() {
                map.insert(key.clone(), index);
            }
            black_box(map.len());
        });
    });
}

/// Benchmark: 1000 lookup hits against each map.
fn bench_map_lookup(c: &mut Criterion) {
    let keys = string_keys(1000, 7);
    let mut chain = ChainMap::new(1000);
    let mut std_map = HashMap::with_capacity(1000);
    let mut index_map = IndexMap::with_capacity(1000);
    for (index, key) in keys.iter().enumerate() {
        chain.insert(key.clone(), index).unwrap();
        std_map.insert(key.clone(), index);
        index_map.insert(key.clone(), index);
    }

    c.bench_function("chain_map_lookup_1000", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(chain.get(key));
            }
        });
    });

    c.bench_function("std_hash_map_lookup_1000", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(std_map.get(key));
            }
        });
    });

    c.bench_function("index_map_lookup_1000", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(index_map.get(key));
            }
        });
    });
}

/// Benchmark: lookups on a map loaded an order of magnitude past its
/// hint, where chains carry the excess.
fn bench_map_lookup_overloaded(c: &mut Criterion) {
    let keys = string_keys(5000, 13);
    let mut map = ChainMap::new(100);
    for (index, key) in keys.iter().enumerate() {
        map.insert(key.clone(), index).unwrap();
    }

    c.bench_function("chain_map_lookup_overloaded_5000", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(key));
            }
        });
    });
}

/// Benchmark: union of two 1000-member sets sharing half their keys.
fn bench_set_union(c: &mut Criterion) {
    let (left_keys, right_keys) = overlapping_keys(1000, 500, 21);
    let mut left = ChainSet::new(1000);
    let mut right = ChainSet::new(1000);
    for key in &left_keys {
        left.insert(key.clone()).unwrap();
    }
    for key in &right_keys {
        right.insert(key.clone()).unwrap();
    }

    c.bench_function("chain_set_union_1000x1000", |b| {
        b.iter(|| {
            let union = ChainSet::union(Some(&left), Some(&right)).unwrap();
            black_box(union.len());
        });
    });
}

/// Benchmark: rebuild a 1000-member set into a wider layout.
fn bench_set_copy(c: &mut Criterion) {
    let keys = string_keys(1000, 33);
    let mut set = ChainSet::new(100);
    for key in &keys {
        set.insert(key.clone()).unwrap();
    }

    c.bench_function("chain_set_copy_into_2048", |b| {
        b.iter(|| {
            let copy = set.copy_with_hint(2048).unwrap();
            black_box(copy.len());
        });
    });
}

criterion_group!(
    benches,
    bench_map_insert,
    bench_map_lookup,
    bench_map_lookup_overloaded,
    bench_set_union,
    bench_set_copy
);
criterion_main!(benches);

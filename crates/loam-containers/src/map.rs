//! Hash-chained map with slab-backed entries.

use std::hash::Hash;
use std::mem;

use loam_core::{AllocError, AllocHooks, HeapHooks, KeyOps, StdKeyOps};

use crate::prime::bucket_count_for;

/// Slab capacity of the first entry reservation.
const FIRST_SLAB_CAPACITY: usize = 8;

/// Hard cap on entries, so every slab link fits in a `u32`.
const MAX_ENTRIES: usize = u32::MAX as usize;

/// One slab entry: a key-value pair plus its chain link.
struct Entry<K, V> {
    key: K,
    value: V,
    /// Next slab index in the same bucket's chain.
    next: Option<u32>,
}

/// Hash map with chained collision resolution and a fixed bucket
/// layout.
///
/// Entries live in a single slab and buckets hold slab indices, so
/// collisions cost an index hop rather than a pointer chase. The bucket
/// count is chosen once, at creation, from a capacity hint rounded up a
/// prime ladder; the map never rehashes, and entries are never removed
/// individually. Load beyond the hint is absorbed by longer chains.
///
/// Inserting an equal key updates the value in place and hands back the
/// previous one; the original key is retained. Key hashing and equality
/// are supplied by a [`KeyOps`] capability, and all backing storage is
/// obtained through [`AllocHooks`].
///
/// # Examples
///
/// ```
/// use loam_containers::ChainMap;
///
/// let mut map = ChainMap::new(100);
/// map.insert("alpha", 1)?;
/// map.insert("beta", 2)?;
/// assert_eq!(map.insert("alpha", 3)?, Some(1));
/// assert_eq!(map.get(&"alpha"), Some(&3));
/// assert_eq!(map.len(), 2);
/// # Ok::<(), loam_core::AllocError>(())
/// ```
pub struct ChainMap<K, V, S = StdKeyOps, H: AllocHooks = HeapHooks> {
    /// Bucket heads, indexing into `entries`. Left empty until the
    /// first insert so that creation never allocates.
    buckets: Vec<Option<u32>>,
    /// Bucket count fixed at creation from the capacity hint.
    bucket_count: usize,
    /// Entry slab; chains are threaded through it by index.
    entries: Vec<Entry<K, V>>,
    ops: S,
    hooks: H,
}

impl<K: Hash + Eq, V> ChainMap<K, V> {
    /// Create a map over the platform heap using the standard hashing
    /// and equality of `K`.
    ///
    /// `hint` is the expected number of entries; the bucket count is
    /// the smallest ladder prime at or above it.
    pub fn new(hint: usize) -> Self {
        Self::with_ops(hint, StdKeyOps)
    }
}

impl<K, V, S: KeyOps<K>> ChainMap<K, V, S> {
    /// Create a map over the platform heap with custom key
    /// capabilities.
    pub fn with_ops(hint: usize, ops: S) -> Self {
        Self::with_hooks(hint, ops, HeapHooks)
    }
}

impl<K, V, S, H: AllocHooks> ChainMap<K, V, S, H> {
    /// Create a map obtaining all backing storage through `hooks`.
    ///
    /// Creation allocates nothing; buckets and slab space are obtained
    /// lazily on first insert.
    pub fn with_hooks(hint: usize, ops: S, hooks: H) -> Self {
        Self {
            buckets: Vec::new(),
            bucket_count: bucket_count_for(hint),
            entries: Vec::new(),
            ops,
            hooks,
        }
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bucket count fixed at creation.
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// The key capability supplied at creation.
    pub fn ops(&self) -> &S {
        &self.ops
    }

    /// The allocation hooks, for inspecting decorator state.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Iterate over entries in bucket order, then chain order within a
    /// bucket. Chains yield the most recently inserted key first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: &self.buckets,
            entries: &self.entries,
            bucket: 0,
            cursor: None,
        }
    }

    /// Make sure the slab has room for one more entry.
    fn reserve_entry(&mut self) -> Result<(), AllocError> {
        if self.entries.len() >= MAX_ENTRIES {
            return Err(AllocError::CapacityExceeded {
                requested: self.entries.len() + 1,
                limit: MAX_ENTRIES,
            });
        }
        if self.entries.len() == self.entries.capacity() {
            let target = self
                .entries
                .capacity()
                .saturating_mul(2)
                .clamp(FIRST_SLAB_CAPACITY, MAX_ENTRIES);
            self.hooks.reallocate(&mut self.entries, target)?;
        }
        Ok(())
    }

    fn ensure_buckets(&mut self) -> Result<(), AllocError> {
        if self.buckets.is_empty() {
            self.buckets = self.hooks.zero_allocate(self.bucket_count)?;
        }
        Ok(())
    }
}

impl<K, V, S: KeyOps<K>, H: AllocHooks> ChainMap<K, V, S, H> {
    fn bucket_index(&self, key: &K) -> usize {
        (self.ops.hash(key) % self.bucket_count as u64) as usize
    }

    /// Walk `bucket`'s chain for an entry equal to `key`.
    fn find_in_bucket(&self, bucket: usize, key: &K) -> Option<u32> {
        let mut cursor = self.buckets[bucket];
        while let Some(index) = cursor {
            let entry = &self.entries[index as usize];
            if self.ops.eq(&entry.key, key) {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    /// Insert `value` under `key`, returning the previous value when
    /// the key was already present.
    ///
    /// On an update the original key is retained; only the value moves.
    /// New entries are pushed onto the front of their bucket's chain.
    ///
    /// # Errors
    ///
    /// Propagates hook failures, and reports
    /// [`AllocError::CapacityExceeded`] once the slab reaches its
    /// index-width cap. No entry is added or updated on error.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        self.ensure_buckets()?;
        let bucket = self.bucket_index(&key);
        if let Some(index) = self.find_in_bucket(bucket, &key) {
            let previous = mem::replace(&mut self.entries[index as usize].value, value);
            return Ok(Some(previous));
        }
        self.reserve_entry()?;
        let index = self.entries.len() as u32;
        let head = self.buckets[bucket];
        self.entries.push(Entry {
            key,
            value,
            next: head,
        });
        self.buckets[bucket] = Some(index);
        Ok(None)
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.entries.is_empty() {
            return None;
        }
        let bucket = self.bucket_index(key);
        let index = self.find_in_bucket(bucket, key)?;
        Some(&self.entries[index as usize].value)
    }

    /// Look up the value stored under `key` for in-place mutation.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.entries.is_empty() {
            return None;
        }
        let bucket = self.bucket_index(key);
        let index = self.find_in_bucket(bucket, key)?;
        Some(&mut self.entries[index as usize].value)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V, S, H: AllocHooks> Drop for ChainMap<K, V, S, H> {
    fn drop(&mut self) {
        self.hooks.release(mem::take(&mut self.buckets));
        self.hooks.release(mem::take(&mut self.entries));
    }
}

/// Iterator over a map's entries in bucket order.
pub struct Iter<'a, K, V> {
    buckets: &'a [Option<u32>],
    entries: &'a [Entry<K, V>],
    bucket: usize,
    cursor: Option<u32>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(index) = self.cursor {
                let entry = &self.entries[index as usize];
                self.cursor = entry.next;
                return Some((&entry.key, &entry.value));
            }
            if self.bucket >= self.buckets.len() {
                return None;
            }
            self.cursor = self.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}

impl<'a, K, V, S, H: AllocHooks> IntoIterator for &'a ChainMap<K, V, S, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::QuotaHooks;
    use std::collections::HashMap;

    #[derive(Clone)]
    struct CaseFold;

    impl KeyOps<String> for CaseFold {
        fn hash(&self, key: &String) -> u64 {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::Hasher;
            let mut hasher = DefaultHasher::new();
            key.to_ascii_lowercase().hash(&mut hasher);
            hasher.finish()
        }

        fn eq(&self, a: &String, b: &String) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    /// Hashes every key to one bucket, forcing chains.
    struct Collider;

    impl KeyOps<u32> for Collider {
        fn hash(&self, _key: &u32) -> u64 {
            7
        }

        fn eq(&self, a: &u32, b: &u32) -> bool {
            a == b
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let mut map = ChainMap::new(16);
        assert_eq!(map.insert("alpha", 1).expect("insert"), None);
        assert_eq!(map.insert("beta", 2).expect("insert"), None);
        assert_eq!(map.get(&"alpha"), Some(&1));
        assert_eq!(map.get(&"beta"), Some(&2));
        assert_eq!(map.get(&"gamma"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_map_answers_without_allocating() {
        let map: ChainMap<String, u32> = ChainMap::new(100);
        assert!(map.is_empty());
        assert_eq!(map.get(&"anything".to_string()), None);
        assert_eq!(map.bucket_count(), 509);
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn upsert_returns_previous_value_and_keeps_original_key() {
        let mut map = ChainMap::with_ops(16, CaseFold);
        assert_eq!(map.insert("Alpha".to_string(), 1).expect("insert"), None);
        assert_eq!(
            map.insert("ALPHA".to_string(), 2).expect("insert"),
            Some(1)
        );
        assert_eq!(map.len(), 1);

        let (key, value) = map.iter().next().expect("one entry");
        assert_eq!(key, "Alpha");
        assert_eq!(*value, 2);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut map = ChainMap::new(16);
        map.insert("count", 1).expect("insert");
        *map.get_mut(&"count").expect("present") += 10;
        assert_eq!(map.get(&"count"), Some(&11));
    }

    #[test]
    fn chains_resolve_collisions() {
        let mut map = ChainMap::with_ops(16, Collider);
        for key in 0..40u32 {
            map.insert(key, key * 3).expect("insert");
        }
        assert_eq!(map.len(), 40);
        for key in 0..40u32 {
            assert_eq!(map.get(&key), Some(&(key * 3)));
        }
        assert!(!map.contains_key(&40));
    }

    #[test]
    fn iteration_visits_every_entry_once() {
        let mut map = ChainMap::new(8);
        let mut expected = HashMap::new();
        for key in 0..50u32 {
            map.insert(key, key + 100).expect("insert");
            expected.insert(key, key + 100);
        }
        let seen: HashMap<u32, u32> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn chain_order_is_most_recent_first() {
        let mut map = ChainMap::with_ops(16, Collider);
        map.insert(1, 10).expect("insert");
        map.insert(2, 20).expect("insert");
        map.insert(3, 30).expect("insert");
        let keys: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 2, 1]);
    }

    #[test]
    fn insert_failure_leaves_the_map_unchanged() {
        let mut map = ChainMap::with_hooks(16, StdKeyOps, QuotaHooks::new(0));
        let err = map.insert("alpha", 1).unwrap_err();
        assert!(matches!(err, AllocError::QuotaExceeded { .. }));
        assert!(map.is_empty());
        assert_eq!(map.get(&"alpha"), None);
    }

    #[test]
    fn bucket_count_follows_the_prime_ladder() {
        let map: ChainMap<u32, u32> = ChainMap::new(100);
        assert_eq!(map.bucket_count(), 509);
        let map: ChainMap<u32, u32> = ChainMap::new(600);
        assert_eq!(map.bucket_count(), 1021);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn behaves_like_the_standard_map(
                inserts in prop::collection::vec((0u8..32, any::<u16>()), 1..200)
            ) {
                let mut map = ChainMap::new(8);
                let mut model = HashMap::new();
                for (key, value) in inserts {
                    let expected = model.insert(key, value);
                    let actual = map.insert(key, value).expect("heap insert succeeds");
                    prop_assert_eq!(actual, expected);
                    prop_assert_eq!(map.len(), model.len());
                }
                for (key, value) in &model {
                    prop_assert_eq!(map.get(key), Some(value));
                }
            }
        }
    }
}

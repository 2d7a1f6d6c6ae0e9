//! Hash-chained set with slab-backed members.

use std::hash::Hash;
use std::mem;

use loam_core::{AllocError, AllocHooks, HeapHooks, KeyOps, StdKeyOps};

use crate::prime::bucket_count_for;

/// Slab capacity of the first member reservation.
const FIRST_SLAB_CAPACITY: usize = 8;

/// Hard cap on members, so every slab link fits in a `u32`.
const MAX_MEMBERS: usize = u32::MAX as usize;

/// One slab entry: a member plus its chain link.
#[derive(Debug)]
struct Entry<T> {
    member: T,
    /// Next slab index in the same bucket's chain.
    next: Option<u32>,
}

/// Hash set with chained collision resolution and a fixed bucket
/// layout.
///
/// Storage follows the same shape as
/// [`ChainMap`](crate::map::ChainMap): a single member slab threaded by
/// 32-bit chain links, a bucket count fixed at creation from a hint
/// rounded up a prime ladder, no rehashing, no per-member removal.
///
/// The one semantic difference is on collision with an equal member:
/// the set swaps the stored member out for the incoming one and hands
/// the old member back. With a custom [`KeyOps`] whose equality is
/// coarser than `==`, that replacement is observable; the set keeps the
/// most recently inserted spelling.
///
/// # Examples
///
/// ```
/// use loam_containers::ChainSet;
///
/// let mut set = ChainSet::new(100);
/// assert_eq!(set.insert("alpha")?, None);
/// assert_eq!(set.insert("alpha")?, Some("alpha"));
/// assert!(set.contains(&"alpha"));
/// assert_eq!(set.len(), 1);
/// # Ok::<(), loam_core::AllocError>(())
/// ```
#[derive(Debug)]
pub struct ChainSet<T, S = StdKeyOps, H: AllocHooks = HeapHooks> {
    /// Bucket heads, indexing into `entries`. Left empty until the
    /// first insert so that creation never allocates.
    buckets: Vec<Option<u32>>,
    /// Bucket count fixed at creation from the capacity hint.
    bucket_count: usize,
    /// Member slab; chains are threaded through it by index.
    entries: Vec<Entry<T>>,
    ops: S,
    hooks: H,
}

impl<T: Hash + Eq> ChainSet<T> {
    /// Create a set over the platform heap using the standard hashing
    /// and equality of `T`.
    ///
    /// `hint` is the expected number of members; the bucket count is
    /// the smallest ladder prime at or above it.
    pub fn new(hint: usize) -> Self {
        Self::with_ops(hint, StdKeyOps)
    }
}

impl<T, S: KeyOps<T>> ChainSet<T, S> {
    /// Create a set over the platform heap with custom member
    /// capabilities.
    pub fn with_ops(hint: usize, ops: S) -> Self {
        Self::with_hooks(hint, ops, HeapHooks)
    }
}

impl<T, S, H: AllocHooks> ChainSet<T, S, H> {
    /// Create a set obtaining all backing storage through `hooks`.
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

    /// Number of members in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bucket count fixed at creation.
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// The member capability supplied at creation.
    pub fn ops(&self) -> &S {
        &self.ops
    }

    /// The allocation hooks, for inspecting decorator state.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Iterate over members in bucket order, then chain order within a
    /// bucket. Chains yield the most recently inserted member first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buckets: &self.buckets,
            entries: &self.entries,
            bucket: 0,
            cursor: None,
        }
    }

    /// Visit every member in iteration order.
    ///
    /// The set cannot be mutated during the walk; the borrow rules make
    /// that a compile-time guarantee rather than a runtime hazard.
    pub fn for_each<F: FnMut(&T)>(&self, mut visit: F) {
        for member in self.iter() {
            visit(member);
        }
    }

    /// Make sure the slab has room for one more member.
    fn reserve_entry(&mut self) -> Result<(), AllocError> {
        if self.entries.len() >= MAX_MEMBERS {
            return Err(AllocError::CapacityExceeded {
                requested: self.entries.len() + 1,
                limit: MAX_MEMBERS,
            });
        }
        if self.entries.len() == self.entries.capacity() {
            let target = self
                .entries
                .capacity()
                .saturating_mul(2)
                .clamp(FIRST_SLAB_CAPACITY, MAX_MEMBERS);
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

impl<T, S: KeyOps<T>, H: AllocHooks> ChainSet<T, S, H> {
    fn bucket_index(&self, member: &T) -> usize {
        (self.ops.hash(member) % self.bucket_count as u64) as usize
    }

    /// Walk `bucket`'s chain for an entry equal to `member`.
    fn find_in_bucket(&self, bucket: usize, member: &T) -> Option<u32> {
        let mut cursor = self.buckets[bucket];
        while let Some(index) = cursor {
            let entry = &self.entries[index as usize];
            if self.ops.eq(&entry.member, member) {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    /// Insert `member`, returning the member it displaced when an equal
    /// one was already present.
    ///
    /// On collision the stored member is replaced by the incoming one.
    /// New members are pushed onto the front of their bucket's chain.
    ///
    /// # Errors
    ///
    /// Propagates hook failures, and reports
    /// [`AllocError::CapacityExceeded`] once the slab reaches its
    /// index-width cap. No member is added or displaced on error.
    pub fn insert(&mut self, member: T) -> Result<Option<T>, AllocError> {
        self.ensure_buckets()?;
        let bucket = self.bucket_index(&member);
        if let Some(index) = self.find_in_bucket(bucket, &member) {
            let previous = mem::replace(&mut self.entries[index as usize].member, member);
            return Ok(Some(previous));
        }
        self.reserve_entry()?;
        let index = self.entries.len() as u32;
        let head = self.buckets[bucket];
        self.entries.push(Entry { member, next: head });
        self.buckets[bucket] = Some(index);
        Ok(None)
    }

    /// Look up the stored member equal to `member`.
    ///
    /// With coarse equality the stored spelling can differ from the
    /// probe, which is why the stored reference is returned.
    pub fn get(&self, member: &T) -> Option<&T> {
        if self.entries.is_empty() {
            return None;
        }
        let bucket = self.bucket_index(member);
        let index = self.find_in_bucket(bucket, member)?;
        Some(&self.entries[index as usize].member)
    }

    /// Whether a member equal to `member` is present.
    pub fn contains(&self, member: &T) -> bool {
        self.get(member).is_some()
    }

    /// Copy the set into a fresh bucket layout sized for `hint`.
    ///
    /// Members are cloned and rehashed into the new layout, which is
    /// how a set outgrowing its original hint gets wider; the source is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Propagates hook failures from building the copy.
    pub fn copy_with_hint(&self, hint: usize) -> Result<Self, AllocError>
    where
        T: Clone,
        S: Clone,
        H: Clone,
    {
        let mut copy = Self::with_hooks(hint, self.ops.clone(), self.hooks.clone());
        if !self.is_empty() {
            copy.ensure_buckets()?;
            copy.hooks.reallocate(&mut copy.entries, self.len())?;
        }
        for member in self.iter() {
            copy.insert(member.clone())?;
        }
        Ok(copy)
    }

    /// Union of two optional sets.
    ///
    /// The larger operand is copied into a layout sized for the
    /// combined length, then the other operand's members are inserted;
    /// on overlap the replacement rule applies, so the smaller
    /// operand's spelling wins. With one operand absent the result is a
    /// copy of the other. The result takes its capabilities and hooks
    /// from the copied operand.
    ///
    /// # Errors
    ///
    /// Propagates hook failures from building the result.
    ///
    /// # Panics
    ///
    /// Panics when both operands are absent.
    pub fn union(a: Option<&Self>, b: Option<&Self>) -> Result<Self, AllocError>
    where
        T: Clone,
        S: Clone,
        H: Clone,
    {
        let (base, other) = match (a, b) {
            (Some(a), Some(b)) if a.len() >= b.len() => (a, Some(b)),
            (Some(a), Some(b)) => (b, Some(a)),
            (Some(a), None) => (a, None),
            (None, Some(b)) => (b, None),
            (None, None) => panic!("set union requires at least one operand"),
        };
        let hint = base
            .len()
            .saturating_add(other.map_or(0, |other| other.len()));
        let mut result = base.copy_with_hint(hint)?;
        if let Some(other) = other {
            for member in other.iter() {
                result.insert(member.clone())?;
            }
        }
        Ok(result)
    }
}

impl<T, S, H: AllocHooks> Drop for ChainSet<T, S, H> {
    fn drop(&mut self) {
        self.hooks.release(mem::take(&mut self.buckets));
        self.hooks.release(mem::take(&mut self.entries));
    }
}

/// Iterator over a set's members in bucket order.
pub struct Iter<'a, T> {
    buckets: &'a [Option<u32>],
    entries: &'a [Entry<T>],
    bucket: usize,
    cursor: Option<u32>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(index) = self.cursor {
                let entry = &self.entries[index as usize];
                self.cursor = entry.next;
                return Some(&entry.member);
            }
            if self.bucket >= self.buckets.len() {
                return None;
            }
            self.cursor = self.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}

impl<'a, T, S, H: AllocHooks> IntoIterator for &'a ChainSet<T, S, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

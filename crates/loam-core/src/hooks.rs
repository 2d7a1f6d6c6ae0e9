//! Pluggable allocation hooks.
//!
//! Every structure in loam obtains and returns its backing buffers
//! through an [`AllocHooks`] value rather than reaching for the global
//! allocator directly. The default [`HeapHooks`] binds to the process
//! heap; decorators such as [`QuotaHooks`] layer policy over another
//! implementation. Because real storage flows through the hooks, a
//! substituted implementation sees every byte a structure acquires and
//! releases.

use crate::error::AllocError;

/// The allocation capability: allocate, zero-allocate, reallocate, and
/// release backing buffers.
///
/// Implemented by the embedding application to substitute the allocation
/// policy. `zero_allocate` and `reallocate` have provided implementations
/// routed through `allocate` and `release`, so a minimal implementation
/// supplies only those two; implementations with a cheaper native path
/// (such as in-place growth) override the provided ones.
pub trait AllocHooks {
    /// Obtain an empty buffer with capacity for at least `len` elements.
    fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError>;

    /// Obtain a buffer holding `len` default-initialized elements.
    fn zero_allocate<T: Clone + Default>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        let mut buf = self.allocate::<T>(len)?;
        buf.resize(len, T::default());
        Ok(buf)
    }

    /// Grow `buf` so its capacity holds at least `new_len` elements.
    ///
    /// Contents are preserved. On error the buffer is untouched, which is
    /// what lets callers keep their "unchanged on failure" guarantee.
    fn reallocate<T>(&mut self, buf: &mut Vec<T>, new_len: usize) -> Result<(), AllocError> {
        if buf.capacity() >= new_len {
            return Ok(());
        }
        let mut grown = self.allocate::<T>(new_len)?;
        grown.extend(buf.drain(..));
        let old = std::mem::replace(buf, grown);
        self.release(old);
        Ok(())
    }

    /// Return a buffer to the underlying allocator.
    fn release<T>(&mut self, buf: Vec<T>);
}

/// Hooks bound to the process heap.
///
/// This is the default binding used everywhere unless the caller
/// substitutes another implementation. Allocation goes through
/// `Vec::try_reserve_exact`, so exhaustion surfaces as
/// [`AllocError::OutOfMemory`] instead of aborting the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapHooks;

impl AllocHooks for HeapHooks {
    fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| AllocError::OutOfMemory {
                requested: len.saturating_mul(std::mem::size_of::<T>()),
            })?;
        Ok(buf)
    }

    fn reallocate<T>(&mut self, buf: &mut Vec<T>, new_len: usize) -> Result<(), AllocError> {
        let additional = new_len.saturating_sub(buf.len());
        buf.try_reserve_exact(additional)
            .map_err(|_| AllocError::OutOfMemory {
                requested: new_len.saturating_mul(std::mem::size_of::<T>()),
            })
    }

    fn release<T>(&mut self, buf: Vec<T>) {
        drop(buf);
    }
}

/// Decorator enforcing a byte budget over inner hooks.
///
/// Admission is checked against the requested size before delegating.
/// Accounting then tracks the capacity actually obtained, which can
/// overshoot the budget by the inner allocator's rounding;
/// [`release`](AllocHooks::release) credits the released capacity back.
#[derive(Clone, Debug)]
pub struct QuotaHooks<H = HeapHooks> {
    inner: H,
    budget: usize,
    used: usize,
}

impl QuotaHooks<HeapHooks> {
    /// Create a byte quota over the process heap.
    pub fn new(budget: usize) -> Self {
        Self::with_inner(budget, HeapHooks)
    }
}

impl<H: AllocHooks> QuotaHooks<H> {
    /// Create a byte quota over caller-supplied inner hooks.
    pub fn with_inner(budget: usize, inner: H) -> Self {
        Self {
            inner,
            budget,
            used: 0,
        }
    }

    /// The configured budget in bytes.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Bytes currently accounted against the budget.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes still admissible under the budget.
    pub fn remaining(&self) -> usize {
        self.budget.saturating_sub(self.used)
    }

    fn admit(&self, requested: usize) -> Result<(), AllocError> {
        if requested > self.remaining() {
            return Err(AllocError::QuotaExceeded {
                requested,
                available: self.remaining(),
            });
        }
        Ok(())
    }
}

impl<H: AllocHooks> AllocHooks for QuotaHooks<H> {
    fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        let elem = std::mem::size_of::<T>();
        self.admit(len.saturating_mul(elem))?;
        let buf = self.inner.allocate(len)?;
        self.used += buf.capacity().saturating_mul(elem);
        Ok(buf)
    }

    fn zero_allocate<T: Clone + Default>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        let elem = std::mem::size_of::<T>();
        self.admit(len.saturating_mul(elem))?;
        let buf = self.inner.zero_allocate(len)?;
        self.used += buf.capacity().saturating_mul(elem);
        Ok(buf)
    }

    fn reallocate<T>(&mut self, buf: &mut Vec<T>, new_len: usize) -> Result<(), AllocError> {
        let elem = std::mem::size_of::<T>();
        let old_bytes = buf.capacity().saturating_mul(elem);
        self.admit(new_len.saturating_mul(elem).saturating_sub(old_bytes))?;
        self.inner.reallocate(buf, new_len)?;
        let new_bytes = buf.capacity().saturating_mul(elem);
        self.used += new_bytes.saturating_sub(old_bytes);
        Ok(())
    }

    fn release<T>(&mut self, buf: Vec<T>) {
        let bytes = buf.capacity().saturating_mul(std::mem::size_of::<T>());
        self.used = self.used.saturating_sub(bytes);
        self.inner.release(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_allocate_reserves_capacity() {
        let mut hooks = HeapHooks;
        let buf: Vec<u8> = hooks.allocate(64).unwrap();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 64);
    }

    #[test]
    fn zero_allocate_fills_with_default() {
        let mut hooks = HeapHooks;
        let buf: Vec<u64> = hooks.zero_allocate(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&v| v == 0));
    }

    #[test]
    fn heap_reallocate_grows_and_preserves_contents() {
        let mut hooks = HeapHooks;
        let mut buf = vec![1u32, 2, 3];
        hooks.reallocate(&mut buf, 100).unwrap();
        assert!(buf.capacity() >= 100);
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn heap_reallocate_to_smaller_len_is_a_no_op() {
        let mut hooks = HeapHooks;
        let mut buf = vec![9u8; 50];
        hooks.reallocate(&mut buf, 10).unwrap();
        assert_eq!(buf.len(), 50);
    }

    /// Minimal implementation exercising the provided method bodies.
    struct PlainHooks;

    impl AllocHooks for PlainHooks {
        fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
            Ok(Vec::with_capacity(len))
        }

        fn release<T>(&mut self, _buf: Vec<T>) {}
    }

    #[test]
    fn provided_reallocate_moves_contents() {
        let mut hooks = PlainHooks;
        let mut buf = vec![7u8; 10];
        hooks.reallocate(&mut buf, 32).unwrap();
        assert!(buf.capacity() >= 32);
        assert_eq!(buf, [7u8; 10]);
    }

    #[test]
    fn provided_zero_allocate_fills_with_default() {
        let mut hooks = PlainHooks;
        let buf: Vec<u32> = hooks.zero_allocate(8).unwrap();
        assert_eq!(buf, [0u32; 8]);
    }

    #[test]
    fn quota_rejects_over_budget() {
        let mut hooks = QuotaHooks::new(64);
        let err = hooks.allocate::<u8>(100).unwrap_err();
        assert_eq!(
            err,
            AllocError::QuotaExceeded {
                requested: 100,
                available: 64,
            }
        );
    }

    #[test]
    fn quota_accounts_element_sizes() {
        let mut hooks = QuotaHooks::new(64);
        // 32 u32 elements is 128 bytes, twice the budget.
        assert!(hooks.allocate::<u32>(32).is_err());
        assert!(hooks.allocate::<u32>(16).is_ok());
    }

    #[test]
    fn quota_release_credits_back() {
        let mut hooks = QuotaHooks::new(1024);
        let buf: Vec<u8> = hooks.allocate(100).unwrap();
        assert!(hooks.used() >= 100);
        hooks.release(buf);
        assert_eq!(hooks.used(), 0);
        assert_eq!(hooks.remaining(), 1024);
    }

    #[test]
    fn quota_reallocate_admits_only_the_growth() {
        let mut hooks = QuotaHooks::new(128);
        let mut buf: Vec<u8> = hooks.allocate(64).unwrap();
        buf.resize(64, 0);
        // Growing 64 -> 120 needs 56 more bytes, within the remaining budget.
        hooks.reallocate(&mut buf, 120).unwrap();
        assert!(buf.capacity() >= 120);
        // Growing past the budget must fail and leave the buffer intact.
        let before = buf.capacity();
        assert!(hooks.reallocate(&mut buf, 4096).is_err());
        assert_eq!(buf.capacity(), before);
        assert_eq!(buf.len(), 64);
    }
}

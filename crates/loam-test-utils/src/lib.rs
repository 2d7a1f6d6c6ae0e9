//! Test utilities for loam development.
//!
//! Provides instrumented [`AllocHooks`] implementations: [`CountingHooks`]
//! for observing how a structure uses its allocator and [`FailingHooks`]
//! for injecting out-of-memory failures at a chosen point.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

use loam_core::{AllocError, AllocHooks, HeapHooks};

/// Per-method call and byte counters shared by [`CountingHooks`] clones.
#[derive(Debug, Default)]
pub struct Counters {
    pub allocate_calls: Cell<usize>,
    pub zero_allocate_calls: Cell<usize>,
    pub reallocate_calls: Cell<usize>,
    pub release_calls: Cell<usize>,
    pub bytes_allocated: Cell<usize>,
    pub bytes_released: Cell<usize>,
}

impl Counters {
    /// Total allocating calls of any kind.
    pub fn total_allocations(&self) -> usize {
        self.allocate_calls.get() + self.zero_allocate_calls.get() + self.reallocate_calls.get()
    }
}

/// Hooks decorator that counts calls and bytes.
///
/// Clones share one [`Counters`] block, so a test can keep a probe clone
/// and read the counts after moving the hooks into the structure under
/// test.
#[derive(Clone, Debug, Default)]
pub struct CountingHooks<H = HeapHooks> {
    inner: H,
    counters: Rc<Counters>,
}

impl CountingHooks<HeapHooks> {
    /// Create counting hooks over the process heap.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: AllocHooks> CountingHooks<H> {
    /// Create counting hooks over caller-supplied inner hooks.
    pub fn with_inner(inner: H) -> Self {
        Self {
            inner,
            counters: Rc::new(Counters::default()),
        }
    }

    /// A shared handle to the counters for later inspection.
    pub fn counters(&self) -> Rc<Counters> {
        Rc::clone(&self.counters)
    }
}

impl<H: AllocHooks> AllocHooks for CountingHooks<H> {
    fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        self.counters
            .allocate_calls
            .set(self.counters.allocate_calls.get() + 1);
        let buf = self.inner.allocate(len)?;
        let bytes = buf.capacity().saturating_mul(std::mem::size_of::<T>());
        self.counters
            .bytes_allocated
            .set(self.counters.bytes_allocated.get() + bytes);
        Ok(buf)
    }

    fn zero_allocate<T: Clone + Default>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        self.counters
            .zero_allocate_calls
            .set(self.counters.zero_allocate_calls.get() + 1);
        let buf = self.inner.zero_allocate(len)?;
        let bytes = buf.capacity().saturating_mul(std::mem::size_of::<T>());
        self.counters
            .bytes_allocated
            .set(self.counters.bytes_allocated.get() + bytes);
        Ok(buf)
    }

    fn reallocate<T>(&mut self, buf: &mut Vec<T>, new_len: usize) -> Result<(), AllocError> {
        self.counters
            .reallocate_calls
            .set(self.counters.reallocate_calls.get() + 1);
        let before = buf.capacity();
        self.inner.reallocate(buf, new_len)?;
        let grown = buf.capacity().saturating_sub(before);
        self.counters.bytes_allocated.set(
            self.counters.bytes_allocated.get() + grown.saturating_mul(std::mem::size_of::<T>()),
        );
        Ok(())
    }

    fn release<T>(&mut self, buf: Vec<T>) {
        self.counters
            .release_calls
            .set(self.counters.release_calls.get() + 1);
        let bytes = buf.capacity().saturating_mul(std::mem::size_of::<T>());
        self.counters
            .bytes_released
            .set(self.counters.bytes_released.get() + bytes);
        self.inner.release(buf);
    }
}

/// Hooks that start failing after a fixed number of successful calls.
///
/// The first `successes` allocating calls (allocate, zero_allocate, or
/// reallocate) are admitted; every later one reports
/// [`AllocError::OutOfMemory`]. Releases always pass through, so
/// structures can still tear down cleanly.
#[derive(Clone, Debug)]
pub struct FailingHooks<H = HeapHooks> {
    inner: H,
    remaining: usize,
}

impl FailingHooks<HeapHooks> {
    /// Heap-backed hooks that fail after `successes` allocating calls.
    pub fn fail_after(successes: usize) -> Self {
        Self::with_inner(successes, HeapHooks)
    }
}

impl<H: AllocHooks> FailingHooks<H> {
    /// Wrap `inner`, failing after `successes` allocating calls.
    pub fn with_inner(successes: usize, inner: H) -> Self {
        Self {
            inner,
            remaining: successes,
        }
    }

    /// Allocating calls still admitted before failures begin.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn admit(&mut self, requested: usize) -> Result<(), AllocError> {
        if self.remaining == 0 {
            return Err(AllocError::OutOfMemory { requested });
        }
        self.remaining -= 1;
        Ok(())
    }
}

impl<H: AllocHooks> AllocHooks for FailingHooks<H> {
    fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        self.admit(len.saturating_mul(std::mem::size_of::<T>()))?;
        self.inner.allocate(len)
    }

    fn zero_allocate<T: Clone + Default>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        self.admit(len.saturating_mul(std::mem::size_of::<T>()))?;
        self.inner.zero_allocate(len)
    }

    fn reallocate<T>(&mut self, buf: &mut Vec<T>, new_len: usize) -> Result<(), AllocError> {
        self.admit(new_len.saturating_mul(std::mem::size_of::<T>()))?;
        self.inner.reallocate(buf, new_len)
    }

    fn release<T>(&mut self, buf: Vec<T>) {
        self.inner.release(buf);
    }
}

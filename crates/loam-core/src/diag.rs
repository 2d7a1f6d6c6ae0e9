//! Caller-owned diagnostic message stack.
//!
//! Allocation failures are fully described by [`AllocError`] return
//! values; the [`MsgStack`] adds optional human-readable context. It is
//! an explicit object owned by whoever wants the messages, not process
//! state, so it is trivially testable and safe to keep per thread.
//! [`RecordingHooks`] wires a stack into the allocation path.

use std::collections::VecDeque;

use crate::error::AllocError;
use crate::hooks::{AllocHooks, HeapHooks};

/// Bounded LIFO stack of formatted diagnostic messages.
///
/// Holds at most [`CAPACITY`](Self::CAPACITY) messages of at most
/// [`MAX_MESSAGE_LEN`](Self::MAX_MESSAGE_LEN) bytes each. Pushing at
/// capacity discards the oldest retained message, so the stack always
/// keeps the most recent failures. Popping an empty stack returns
/// `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgStack {
    messages: VecDeque<String>,
}

impl MsgStack {
    /// Maximum number of retained messages.
    pub const CAPACITY: usize = 20;

    /// Maximum length of a single message in bytes.
    pub const MAX_MESSAGE_LEN: usize = 256;

    /// Create an empty message stack.
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(Self::CAPACITY),
        }
    }

    /// Push a message, truncated to [`MAX_MESSAGE_LEN`](Self::MAX_MESSAGE_LEN) bytes.
    ///
    /// Truncation backs up to a character boundary, so the retained text
    /// is always valid UTF-8. At capacity, the oldest retained message is
    /// discarded to make room.
    pub fn push(&mut self, message: &str) {
        let mut end = Self::MAX_MESSAGE_LEN.min(message.len());
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        if self.messages.len() == Self::CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message[..end].to_string());
    }

    /// Pop the most recent message, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<String> {
        self.messages.pop_back()
    }

    /// The most recent message, without removing it.
    pub fn last(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    /// Number of retained messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the stack holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Discard all retained messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for MsgStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Hooks decorator that records allocation failures.
///
/// Wraps inner hooks and pushes a formatted message onto an owned
/// [`MsgStack`] whenever an inner call fails, then propagates the error
/// unchanged. Successful calls and releases pass through silently;
/// contract violations panic before reaching the hooks and are never
/// recorded.
#[derive(Clone, Debug)]
pub struct RecordingHooks<H = HeapHooks> {
    inner: H,
    diag: MsgStack,
}

impl RecordingHooks<HeapHooks> {
    /// Create recording hooks over the process heap.
    pub fn new() -> Self {
        Self::with_inner(HeapHooks)
    }
}

impl Default for RecordingHooks<HeapHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: AllocHooks> RecordingHooks<H> {
    /// Create recording hooks over caller-supplied inner hooks.
    pub fn with_inner(inner: H) -> Self {
        Self {
            inner,
            diag: MsgStack::new(),
        }
    }

    /// The recorded failure messages.
    pub fn diag(&self) -> &MsgStack {
        &self.diag
    }

    /// Mutable access for popping or clearing recorded messages.
    pub fn diag_mut(&mut self) -> &mut MsgStack {
        &mut self.diag
    }

    fn record(&mut self, op: &str, err: &AllocError) {
        self.diag.push(&format!("{op} failed: {err}"));
    }
}

impl<H: AllocHooks> AllocHooks for RecordingHooks<H> {
    fn allocate<T>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        match self.inner.allocate(len) {
            Ok(buf) => Ok(buf),
            Err(err) => {
                self.record("allocate", &err);
                Err(err)
            }
        }
    }

    fn zero_allocate<T: Clone + Default>(&mut self, len: usize) -> Result<Vec<T>, AllocError> {
        match self.inner.zero_allocate(len) {
            Ok(buf) => Ok(buf),
            Err(err) => {
                self.record("zero_allocate", &err);
                Err(err)
            }
        }
    }

    fn reallocate<T>(&mut self, buf: &mut Vec<T>, new_len: usize) -> Result<(), AllocError> {
        match self.inner.reallocate(buf, new_len) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.record("reallocate", &err);
                Err(err)
            }
        }
    }

    fn release<T>(&mut self, buf: Vec<T>) {
        self.inner.release(buf);
    }
}

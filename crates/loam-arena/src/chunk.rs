//! Fixed-capacity byte chunks advanced by a bump cursor.

/// A single contiguous chunk of arena storage.
///
/// Bytes are handed out front to back by moving a cursor; nothing is
/// ever freed piecemeal. A spent chunk is either rewound for reuse or
/// handed back to the hooks whole.
pub(crate) struct Chunk {
    /// Backing buffer. Its length fixes the chunk capacity.
    data: Vec<u8>,
    /// Bump cursor, the next free byte position.
    avail: usize,
}

impl Chunk {
    /// Wrap a buffer obtained from the hooks as an empty chunk.
    pub(crate) fn new(data: Vec<u8>) -> Self {
        Self { data, avail: 0 }
    }

    /// Bump-allocate `len` bytes, returning the starting offset, or
    /// `None` when the remaining capacity is insufficient.
    pub(crate) fn alloc(&mut self, len: usize) -> Option<usize> {
        let new_avail = self.avail.checked_add(len)?;
        if new_avail > self.data.len() {
            return None;
        }
        let offset = self.avail;
        self.avail = new_avail;
        Some(offset)
    }

    /// Shared view of `len` bytes starting at `offset`.
    ///
    /// Panics if the region exceeds the chunk capacity.
    pub(crate) fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    /// Mutable view of `len` bytes starting at `offset`.
    ///
    /// Panics if the region exceeds the chunk capacity.
    pub(crate) fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }

    /// Rewind the cursor without touching the backing bytes.
    pub(crate) fn reset(&mut self) {
        self.avail = 0;
    }

    /// Bytes handed out so far.
    pub(crate) fn used(&self) -> usize {
        self.avail
    }

    /// Total capacity in bytes.
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes still available.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.avail
    }

    /// Recover the backing buffer, for release through the hooks.
    pub(crate) fn into_buf(self) -> Vec<u8> {
        self.data
    }
}

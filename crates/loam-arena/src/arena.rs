//! Chunked bump allocation with free-chunk recycling.

use loam_core::{AllocError, AllocHooks, HeapHooks};
use smallvec::SmallVec;

use crate::chunk::Chunk;
use crate::config::ArenaConfig;
use crate::handle::ArenaHandle;

/// Strictest alignment honored by every allocation, in bytes.
///
/// Sizes are rounded up to a multiple of this value and every chunk
/// starts allocations at offset zero, so any scalar value can be placed
/// at the start of a returned region.
pub const MAX_ALIGN: usize = 16;

/// Largest single request the arena accepts, in bytes.
///
/// Handles address chunk interiors with 32-bit offsets; the cap keeps
/// every offset and length representable after alignment rounding.
pub const MAX_ALLOC_BYTES: usize = (u32::MAX - (MAX_ALIGN as u32 - 1)) as usize;

/// Round `size` up to the next multiple of [`MAX_ALIGN`].
///
/// Callers check `size` against [`MAX_ALLOC_BYTES`] first, so the sum
/// cannot overflow.
fn round_up(size: usize) -> usize {
    (size + (MAX_ALIGN - 1)) & !(MAX_ALIGN - 1)
}

/// Chunked bump allocator with aligned regions and chunk recycling.
///
/// The arena owns a list of byte chunks. The most recent chunk is the
/// live bump window: allocation advances its cursor and is O(1). When a
/// request does not fit, the arena swaps in a chunk parked by an
/// earlier [`reset`](Self::reset), or obtains a fresh one through its
/// [`AllocHooks`], oversized by the configured slack so later small
/// requests ride along.
///
/// Individual allocations are never freed. [`reset`](Self::reset)
/// retires everything at once: it bumps the arena generation, which
/// invalidates every outstanding [`ArenaHandle`], and parks the spent
/// chunks for the next round.
///
/// # Examples
///
/// ```
/// use loam_arena::Arena;
///
/// let mut arena = Arena::new();
/// let handle = arena.alloc(5)?;
/// arena.bytes_mut(handle)[..5].copy_from_slice(b"hello");
/// assert_eq!(&arena.bytes(handle)[..5], b"hello");
///
/// arena.reset();
/// assert_eq!(arena.used_bytes(), 0);
/// # Ok::<(), loam_core::AllocError>(())
/// ```
pub struct Arena<H: AllocHooks = HeapHooks> {
    /// Live chunks. The last entry is the bump window; earlier entries
    /// are exhausted but still back outstanding handles.
    chunks: Vec<Chunk>,
    /// Spent chunks parked by reset, bounded by the config.
    free_cache: SmallVec<[Chunk; ArenaConfig::DEFAULT_FREE_CACHE_LIMIT]>,
    /// Reset epoch, stamped into every handle.
    generation: u32,
    config: ArenaConfig,
    hooks: H,
}

impl Arena<HeapHooks> {
    /// Create an empty arena over the platform heap with default
    /// configuration. Creation allocates nothing; storage is obtained
    /// lazily on first use.
    pub fn new() -> Self {
        Self::with_hooks(ArenaConfig::new(), HeapHooks)
    }

    /// Create an empty arena over the platform heap with the given
    /// configuration.
    pub fn with_config(config: ArenaConfig) -> Self {
        Self::with_hooks(config, HeapHooks)
    }
}

impl Default for Arena<HeapHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: AllocHooks> Arena<H> {
    /// Create an empty arena obtaining all chunk storage through
    /// `hooks`.
    pub fn with_hooks(config: ArenaConfig, hooks: H) -> Self {
        Self {
            chunks: Vec::new(),
            free_cache: SmallVec::new(),
            generation: 0,
            config,
            hooks,
        }
    }

    /// Allocate `size` bytes aligned to [`MAX_ALIGN`].
    ///
    /// The handle stays valid until the next [`reset`](Self::reset) or
    /// drop. The region's length is `size` rounded up to the alignment,
    /// and its contents are unspecified; recycled chunks carry stale
    /// bytes. Use [`zero_alloc`](Self::zero_alloc) for cleared memory.
    ///
    /// # Errors
    ///
    /// [`AllocError::CapacityExceeded`] when `size` exceeds
    /// [`MAX_ALLOC_BYTES`], or whatever the hooks report when growth
    /// fails. Either way the arena is left exactly as it was.
    ///
    /// # Panics
    ///
    /// Panics when `size` is zero.
    pub fn alloc(&mut self, size: usize) -> Result<ArenaHandle, AllocError> {
        assert!(size > 0, "arena allocation size must be non-zero");
        if size > MAX_ALLOC_BYTES {
            return Err(AllocError::CapacityExceeded {
                requested: size,
                limit: MAX_ALLOC_BYTES,
            });
        }
        let aligned = round_up(size);
        if let Some(handle) = self.bump(aligned) {
            return Ok(handle);
        }
        self.grow(aligned)?;
        let handle = self
            .bump(aligned)
            .expect("a grown chunk always fits the request that grew it");
        Ok(handle)
    }

    /// Allocate `count * size` bytes, zero-filled and aligned to
    /// [`MAX_ALIGN`].
    ///
    /// Unlike [`alloc`](Self::alloc), the returned region is cleared in
    /// full even when it lands in a recycled chunk.
    ///
    /// # Errors
    ///
    /// [`AllocError::CapacityExceeded`] when the product overflows or
    /// exceeds [`MAX_ALLOC_BYTES`], or whatever the hooks report when
    /// growth fails.
    ///
    /// # Panics
    ///
    /// Panics when `count` or `size` is zero.
    pub fn zero_alloc(&mut self, count: usize, size: usize) -> Result<ArenaHandle, AllocError> {
        assert!(
            count > 0 && size > 0,
            "arena zeroed allocation requires non-zero count and size"
        );
        let total = count.checked_mul(size).unwrap_or(usize::MAX);
        let handle = self.alloc(total)?;
        self.bytes_mut(handle).fill(0);
        Ok(handle)
    }

    /// Try to place `aligned` bytes in the live bump window.
    fn bump(&mut self, aligned: usize) -> Option<ArenaHandle> {
        let index = self.chunks.len().checked_sub(1)?;
        let offset = self.chunks[index].alloc(aligned)?;
        Some(ArenaHandle::new(
            self.generation,
            index as u32,
            offset as u32,
            aligned as u32,
        ))
    }

    /// Open a new bump window with room for `aligned` bytes, preferring
    /// a parked chunk over the hooks.
    fn grow(&mut self, aligned: usize) -> Result<(), AllocError> {
        if self.chunks.len() >= u32::MAX as usize {
            return Err(AllocError::CapacityExceeded {
                requested: self.chunks.len() + 1,
                limit: u32::MAX as usize,
            });
        }
        let reusable = self
            .free_cache
            .iter()
            .position(|chunk| chunk.capacity() >= aligned);
        let chunk = match reusable {
            Some(position) => self.free_cache.swap_remove(position),
            None => {
                let capacity = aligned
                    .saturating_add(self.config.chunk_slack)
                    .min(u32::MAX as usize);
                let mut buf = self.hooks.allocate::<u8>(capacity)?;
                buf.resize(capacity, 0);
                Chunk::new(buf)
            }
        };
        self.chunks.push(chunk);
        Ok(())
    }

    /// Shared view of the bytes named by `handle`.
    ///
    /// # Panics
    ///
    /// Panics when `handle` predates the most recent reset.
    pub fn bytes(&self, handle: ArenaHandle) -> &[u8] {
        self.check_generation(handle);
        self.chunks[handle.chunk() as usize].slice(handle.offset() as usize, handle.len() as usize)
    }

    /// Mutable view of the bytes named by `handle`.
    ///
    /// # Panics
    ///
    /// Panics when `handle` predates the most recent reset.
    pub fn bytes_mut(&mut self, handle: ArenaHandle) -> &mut [u8] {
        self.check_generation(handle);
        self.chunks[handle.chunk() as usize]
            .slice_mut(handle.offset() as usize, handle.len() as usize)
    }

    fn check_generation(&self, handle: ArenaHandle) {
        assert!(
            handle.generation() == self.generation,
            "stale handle: {handle}, arena is at generation {}",
            self.generation
        );
    }

    /// Invalidate every outstanding handle and empty the arena for
    /// reuse.
    ///
    /// Spent chunks are rewound and parked on the free cache up to the
    /// configured bound; the excess goes back to the hooks. The arena
    /// itself stays fully usable.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        for mut chunk in self.chunks.drain(..) {
            chunk.reset();
            if self.free_cache.len() < self.config.free_cache_limit {
                self.free_cache.push(chunk);
            } else {
                self.hooks.release(chunk.into_buf());
            }
        }
    }

    /// Bytes handed out since the last reset, alignment padding
    /// included.
    pub fn used_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::used).sum()
    }

    /// Bytes held in chunk storage, both live and parked.
    pub fn memory_bytes(&self) -> usize {
        let live: usize = self.chunks.iter().map(Chunk::capacity).sum();
        let parked: usize = self.free_cache.iter().map(Chunk::capacity).sum();
        live + parked
    }

    /// Number of live chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks parked for reuse.
    pub fn cached_chunk_count(&self) -> usize {
        self.free_cache.len()
    }

    /// The current reset epoch.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The configuration the arena was created with.
    pub fn config(&self) -> ArenaConfig {
        self.config
    }

    /// The allocation hooks, for inspecting decorator state.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

impl<H: AllocHooks> Drop for Arena<H> {
    fn drop(&mut self) {
        for chunk in self.chunks.drain(..) {
            self.hooks.release(chunk.into_buf());
        }
        for chunk in self.free_cache.drain(..) {
            self.hooks.release(chunk.into_buf());
        }
    }
}

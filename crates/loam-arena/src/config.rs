//! Arena tuning parameters.

/// Tuning parameters for an arena.
///
/// Both values are fixed at arena creation. The defaults suit the
/// common allocate-use-reset-repeat pattern with many small requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Extra bytes added to every freshly obtained chunk beyond the
    /// request that forced it, so later small requests can ride along
    /// without touching the hooks again.
    pub chunk_slack: usize,

    /// Maximum number of spent chunks parked for reuse on reset.
    /// Chunks beyond this bound go back to the hooks instead.
    pub free_cache_limit: usize,
}

impl ArenaConfig {
    /// Default chunk slack in bytes.
    pub const DEFAULT_CHUNK_SLACK: usize = 10 * 1024;

    /// Default bound on the free-chunk cache.
    pub const DEFAULT_FREE_CACHE_LIMIT: usize = 10;

    /// Create a config with the default tuning values.
    pub fn new() -> Self {
        Self {
            chunk_slack: Self::DEFAULT_CHUNK_SLACK,
            free_cache_limit: Self::DEFAULT_FREE_CACHE_LIMIT,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

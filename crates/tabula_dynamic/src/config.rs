//! Configuration for schema caches.

/// Configuration for one [`SchemaCache`](crate::SchemaCache).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaCacheConfig {
    /// Number of cache entries above which dead entries are pruned on insert.
    pub prune_threshold: usize,
}

impl Default for SchemaCacheConfig {
    fn default() -> Self {
        Self {
            prune_threshold: 64,
        }
    }
}

impl SchemaCacheConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prunes dead entries on every insert.
    ///
    /// Suited to resources that are recompiled often, where stale versions
    /// would otherwise pile up between prunes.
    #[must_use]
    pub fn eager() -> Self {
        Self { prune_threshold: 0 }
    }

    /// Builder method to set the prune threshold.
    #[must_use]
    pub fn with_prune_threshold(mut self, threshold: usize) -> Self {
        self.prune_threshold = threshold;
        self
    }
}

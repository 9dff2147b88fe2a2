//! Shared derived schemas, one per resource version.
//!
//! The cache only holds weak references. A bundle lives as long as some
//! record is bound to it; once the last record rebinds or is destroyed, the
//! entry is dead and the next [`SchemaCache::acquire`] for that key derives
//! again.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tabula_foundation::Result;
use tabula_storage::PropertySchema;

use crate::bundle::SchemaBundle;
use crate::config::SchemaCacheConfig;
use crate::resource::{ResourceKey, SchemaSource};

/// Weakly held bundles keyed by resource version.
#[derive(Debug, Default)]
pub struct SchemaCache {
    config: SchemaCacheConfig,
    entries: HashMap<ResourceKey, Weak<SchemaBundle>>,
    derivations: usize,
}

impl SchemaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with the given configuration.
    #[must_use]
    pub fn with_config(config: SchemaCacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the cache configuration.
    #[must_use]
    pub fn config(&self) -> &SchemaCacheConfig {
        &self.config
    }

    /// Returns the live bundle for `source`'s current version, deriving it
    /// from `base` if no record holds one.
    ///
    /// # Errors
    ///
    /// Returns the derivation error; nothing is cached in that case.
    pub fn acquire(
        &mut self,
        base: &PropertySchema,
        source: &dyn SchemaSource,
    ) -> Result<Arc<SchemaBundle>> {
        let key = ResourceKey::of(source);
        if let Some(bundle) = self.get(key) {
            return Ok(bundle);
        }

        let bundle = Arc::new(SchemaBundle::derive(base, source)?);
        self.derivations += 1;
        self.entries.insert(key, Arc::downgrade(&bundle));

        if self.entries.len() > self.config.prune_threshold {
            self.prune();
        }
        Ok(bundle)
    }

    /// Returns the live bundle for `key`, if any record holds it.
    #[must_use]
    pub fn get(&self, key: ResourceKey) -> Option<Arc<SchemaBundle>> {
        self.entries.get(&key).and_then(Weak::upgrade)
    }

    /// Drops entries no record holds. Returns the number dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, bundle| bundle.strong_count() > 0);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            log::trace!("pruned {pruned} dead schema bundles");
        }
        pruned
    }

    /// Number of derivations performed so far.
    #[must_use]
    pub fn derivations(&self) -> usize {
        self.derivations
    }

    /// Number of bundles some record still holds.
    #[must_use]
    pub fn live_bundles(&self) -> usize {
        self.entries
            .values()
            .filter(|bundle| bundle.strong_count() > 0)
            .count()
    }

    /// Number of entries, live or dead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

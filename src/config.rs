//! Configuration Module
//!
//! Runtime settings for the cache: whether statistics are recorded and
//! which backing maps the store is built over. Defaults come from
//! `Default`, may be overridden from environment variables, and are
//! checked once at construction time by `validate`.

use std::collections::HashSet;
use std::env;
use std::sync::Arc;

use crate::cache::backend::{hash_map_factory, validate_backend, MapFactory};
use crate::cache::CacheEntry;
use crate::error::Result;

/// Statistics recording is off unless explicitly enabled.
const DEFAULT_STATISTICS: bool = false;

// == Cache Config ==
/// Configuration for a cache provider.
#[derive(Clone)]
pub struct CacheConfig {
    /// Record hit/miss/load counters when true
    pub enable_statistics: bool,
    /// Factory for the forward map (result-id -> entry)
    pub result_map: MapFactory<CacheEntry>,
    /// Factory for the reverse index (source key -> result-ids)
    pub key_index_map: MapFactory<HashSet<String>>,
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("enable_statistics", &self.enable_statistics)
            .finish()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_statistics: DEFAULT_STATISTICS,
            result_map: hash_map_factory(),
            key_index_map: hash_map_factory(),
        }
    }
}

impl CacheConfig {
    // == Environment Loading ==
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// * `SIDECACHE_STATISTICS` - "true" to record statistics
    pub fn from_env() -> Self {
        let enable_statistics = env::var("SIDECACHE_STATISTICS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_STATISTICS);

        Self {
            enable_statistics,
            ..Self::default()
        }
    }

    // == Builders ==
    /// Enables or disables statistics recording.
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.enable_statistics = enabled;
        self
    }

    /// Replaces the forward-map factory.
    pub fn with_result_map(mut self, factory: MapFactory<CacheEntry>) -> Self {
        self.result_map = factory;
        self
    }

    /// Replaces the reverse-index factory.
    pub fn with_key_index_map(mut self, factory: MapFactory<HashSet<String>>) -> Self {
        self.key_index_map = factory;
        self
    }

    // == Validation ==
    /// Probes both map factories against the backend contract.
    ///
    /// Called once when a provider is constructed, so a broken custom
    /// backend fails loudly instead of corrupting the cache later.
    pub fn validate(&self) -> Result<()> {
        validate_backend(&self.result_map, "result map")?;
        validate_backend(&self.key_index_map, "key index map")?;
        Ok(())
    }
}

// == Factory Shorthand ==
/// Wraps a backend constructor into a `MapFactory`.
pub fn map_factory<V, B, F>(build: F) -> MapFactory<V>
where
    V: Send + 'static,
    B: crate::cache::backend::MapBackend<V> + 'static,
    F: Fn() -> B + Send + Sync + 'static,
{
    Arc::new(move || Box::new(build()))
}

//! Cache Provider Module
//!
//! The [`CacheProvider`] ties the pieces together: it owns the dual-map
//! store and the statistics counters behind one mutex, serves reads
//! through the cache, consumes invalidation signals pushed by the
//! transport, and emits notification events.
//!
//! Locking discipline: the mutex is only ever held for plain map work,
//! never across the remote execution await. The invalidation path is
//! fully synchronous, so server pushes always make immediate progress
//! regardless of in-flight reads. The cost of that choice is a small
//! eventual-consistency window: a read dispatched before an invalidation
//! and stored after it may cache a value that is already stale. The
//! window is bounded by the duration of the in-flight remote call.

use std::future::Future;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::cache::{CacheStats, CacheStore, CachedValue, StatsRecorder};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::provider::events::{Invalidation, InvalidationBus};
use crate::provider::interface::{CacheableRead, ClientSideCache};

// == Provider State ==
/// Store and counters guarded as one unit, so every counter increment is
/// observed together with the map change it describes.
struct ProviderState {
    store: CacheStore,
    stats: StatsRecorder,
}

// == Cache Provider ==
/// Client-side read cache driven by server-pushed invalidations.
///
/// Shared by reference between the caller side (reads) and the transport
/// side (invalidation signals, lifecycle hooks); all methods take `&self`.
pub struct CacheProvider {
    state: Mutex<ProviderState>,
    bus: InvalidationBus,
}

impl std::fmt::Debug for CacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CacheProvider")
            .field("entries", &state.store.len())
            .field("source_keys", &state.store.source_key_count())
            .finish()
    }
}

impl CacheProvider {
    // == Constructor ==
    /// Builds a provider from a configuration.
    ///
    /// Probes the configured map factories first and fails with
    /// [`CacheError::InvalidConfig`](crate::error::CacheError) if either
    /// does not behave like an associative map, so a broken backend is
    /// rejected here rather than discovered mid-operation.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = CacheStore::with_backends((config.result_map)(), (config.key_index_map)());
        tracing::debug!(
            statistics = config.enable_statistics,
            "cache provider created"
        );

        Ok(Self {
            state: Mutex::new(ProviderState {
                store,
                stats: StatsRecorder::new(config.enable_statistics),
            }),
            bus: InvalidationBus::new(),
        })
    }
}

impl ClientSideCache for CacheProvider {
    // == Read Through ==
    fn read_through<E, F, Fut>(
        &self,
        read: CacheableRead,
        execute: F,
    ) -> impl Future<Output = std::result::Result<CachedValue, E>> + Send
    where
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<CachedValue, E>> + Send,
    {
        async move {
            let result_id = read.result_id();

            let cached = {
                let mut state = self.state.lock();
                let found = state.store.lookup(&result_id).cloned();
                match found {
                    Some(_) => state.stats.record_hit(),
                    None => state.stats.record_miss(),
                }
                found
            };

            if let Some(value) = cached {
                return Ok(value);
            }

            // Lock released while the remote call is in flight.
            let started = Instant::now();
            match execute().await {
                Ok(raw) => {
                    let value = read.transform_reply(raw);
                    tracing::debug!(
                        result_id = %result_id,
                        source_keys = read.source_keys.len(),
                        "cached remote read"
                    );
                    let mut state = self.state.lock();
                    state.stats.record_load_success(started.elapsed());
                    state
                        .store
                        .insert(result_id, value.clone(), &read.source_keys);
                    Ok(value)
                }
                Err(error) => {
                    self.state.lock().stats.record_load_failure(started.elapsed());
                    Err(error)
                }
            }
        }
    }

    // == Invalidation ==
    fn invalidate(&self, key: Option<&str>) {
        match key {
            Some(key) => {
                let removed = {
                    let mut state = self.state.lock();
                    let removed = state.store.remove_by_source_key(key);
                    state.stats.record_evictions(removed);
                    removed
                };
                tracing::debug!(key = %key, removed, "invalidation signal");
                // The event reports the signal, not its local effect.
                self.bus.emit(Invalidation::Key(key.to_string()));
            }
            None => {
                let removed = {
                    let mut state = self.state.lock();
                    let removed = state.store.clear_all();
                    state.stats.record_evictions(removed);
                    removed
                };
                tracing::debug!(removed, "flush signal");
                self.bus.emit(Invalidation::Flush);
            }
        }
    }

    // == Lifecycle ==
    fn reset(&self) {
        let removed = self.state.lock().store.clear_all();
        tracing::debug!(removed, "cache reset");
    }

    fn on_transport_error(&self) {
        tracing::warn!("transport error, dropping all cached state");
        self.reset();
    }

    fn on_transport_closed(&self) {
        tracing::info!("transport closed, dropping all cached state");
        self.reset();
    }

    // == Introspection ==
    fn entry_count(&self) -> usize {
        self.state.lock().store.len()
    }

    fn stats(&self) -> CacheStats {
        self.state.lock().stats.snapshot()
    }

    fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.bus.subscribe()
    }
}

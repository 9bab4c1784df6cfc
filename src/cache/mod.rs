//! Cache Module
//!
//! In-memory storage for cached read results: result-id encoding, the
//! dual-map store with its reverse invalidation index, swappable backing
//! maps, and statistics counters.

pub mod backend;
pub mod key;

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;

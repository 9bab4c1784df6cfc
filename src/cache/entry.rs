//! Cache Entry Module
//!
//! Defines the structure for individual cached results.
//!
//! An entry couples the materialized reply of a read operation with the
//! source keys that reply was computed from. The source-key list is what
//! lets removal walk back through the reverse index and detach every
//! membership the entry holds, keeping the two maps consistent.

use serde_json::Value;

// == Cached Value ==
/// The fully materialized, transformed reply of a read operation.
///
/// Scalars, sequences and mappings are all representable, and `Null` is a
/// legitimate cacheable value: "the key does not exist" is a result, not
/// a cache miss. `clone()` performs a full structural copy, which is the
/// isolation boundary between stored state and caller-held values.
pub type CachedValue = Value;

// == Cache Entry ==
/// A single cached result and the source keys it depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheEntry {
    /// The stored reply
    pub value: CachedValue,
    /// Source keys the reply was computed from, deduplicated,
    /// first-occurrence order preserved
    pub source_keys: Vec<String>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// Duplicate source keys collapse to one membership (a read like
    /// `MGET k k` depends on `k` once); an empty list is valid and means
    /// the entry can only be cleared by a global flush.
    ///
    /// # Arguments
    /// * `value` - The materialized reply to store
    /// * `source_keys` - Source keys the producing read touched
    pub fn new(value: CachedValue, source_keys: &[String]) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(source_keys.len());
        for key in source_keys {
            if !deduped.iter().any(|k| k == key) {
                deduped.push(key.clone());
            }
        }

        Self {
            value,
            source_keys: deduped,
        }
    }

    // == Depends On ==
    /// Returns true if this entry was computed from the given source key.
    pub fn depends_on(&self, key: &str) -> bool {
        self.source_keys.iter().any(|k| k == key)
    }
}

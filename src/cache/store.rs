//! Cache Store Module
//!
//! Main cache engine combining two associative structures: the forward map
//! (result-id to cached entry) and the reverse index (source key to the set
//! of result-ids computed from it).
//!
//! The two maps move in lockstep. An entry and its index memberships are
//! created together on insert and destroyed together on removal, in either
//! direction: removing by source key deletes every dependent entry and
//! detaches those entries from the index sets of their *other* source keys,
//! and replacing an entry first drops the memberships of the entry it
//! replaces. Index sets are pruned the moment they become empty, so the
//! reverse index never holds a result-id without a forward entry and never
//! holds an empty set.

use std::collections::HashSet;

use crate::cache::backend::{hash_map_factory, MapBackend};
use crate::cache::{CacheEntry, CachedValue};

// == Cache Store ==
/// Dual-map storage for cached read results.
///
/// Owns both maps exclusively; all mutation goes through the operations
/// below. The store itself is synchronous and policy-free: counting,
/// locking and event emission belong to the layers above.
pub struct CacheStore {
    /// Forward map: result-id -> cached entry
    results: Box<dyn MapBackend<CacheEntry>>,
    /// Reverse index: source key -> result-ids depending on it
    key_index: Box<dyn MapBackend<HashSet<String>>>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("results", &self.results.len())
            .field("source_keys", &self.key_index.len())
            .finish()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates a CacheStore over the default `HashMap` backends.
    pub fn new() -> Self {
        Self {
            results: hash_map_factory()(),
            key_index: hash_map_factory()(),
        }
    }

    /// Creates a CacheStore over caller-supplied backing maps.
    ///
    /// The backends are assumed to have passed the construction-time
    /// contract check (see `backend::validate_backend`).
    pub fn with_backends(
        results: Box<dyn MapBackend<CacheEntry>>,
        key_index: Box<dyn MapBackend<HashSet<String>>>,
    ) -> Self {
        Self { results, key_index }
    }

    // == Lookup ==
    /// Retrieves the cached value for a result-id.
    ///
    /// O(1) average; a miss has no side effect of any kind.
    pub fn lookup(&self, result_id: &str) -> Option<&CachedValue> {
        self.results.get(result_id).map(|entry| &entry.value)
    }

    // == Insert ==
    /// Stores a value under `result_id` and registers the result-id in the
    /// index set of every source key.
    ///
    /// If an entry already exists under `result_id` it is replaced, and
    /// its old index memberships are detached first so the replacement
    /// cannot leave the maps out of step.
    ///
    /// # Arguments
    /// * `result_id` - Identifier derived from the read's argument list
    /// * `value` - The materialized reply to cache
    /// * `source_keys` - Source keys the read touched (may be empty)
    pub fn insert(&mut self, result_id: String, value: CachedValue, source_keys: &[String]) {
        self.detach(&result_id);

        let entry = CacheEntry::new(value, source_keys);
        for key in &entry.source_keys {
            match self.key_index.get_mut(key) {
                Some(dependents) => {
                    dependents.insert(result_id.clone());
                }
                None => {
                    let mut dependents = HashSet::new();
                    dependents.insert(result_id.clone());
                    self.key_index.insert(key.clone(), dependents);
                }
            }
        }

        self.results.insert(result_id, entry);
    }

    // == Remove By Source Key ==
    /// Removes every cached result that depends on `key`.
    ///
    /// Deletes the key's index entry, every member result-id from the
    /// forward map, and each removed result-id's memberships under its
    /// other source keys (pruning sets that become empty). Returns the
    /// number of forward entries removed; an unknown key is a no-op
    /// returning 0.
    pub fn remove_by_source_key(&mut self, key: &str) -> usize {
        let dependents = match self.key_index.remove(key) {
            Some(dependents) => dependents,
            None => return 0,
        };

        let mut removed = 0;
        for result_id in dependents {
            let entry = match self.results.remove(&result_id) {
                Some(entry) => entry,
                None => continue,
            };
            removed += 1;

            for other in &entry.source_keys {
                if other != key {
                    self.forget_membership(other, &result_id);
                }
            }
        }

        removed
    }

    // == Clear All ==
    /// Empties both maps. Returns the prior forward-map size.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.results.len();
        self.results.clear();
        self.key_index.clear();
        removed
    }

    // == Length ==
    /// Returns the current number of cached results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    // == Is Empty ==
    /// Returns true if no results are cached.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    // == Source Key Count ==
    /// Returns the number of source keys currently tracked in the reverse
    /// index. Bounded by the sum of live entries' key counts because empty
    /// sets are pruned eagerly.
    pub fn source_key_count(&self) -> usize {
        self.key_index.len()
    }

    // == Dependents ==
    /// Returns the set of result-ids depending on a source key, if any.
    pub fn dependents(&self, key: &str) -> Option<&HashSet<String>> {
        self.key_index.get(key)
    }

    // == Internal Helpers ==
    /// Removes an entry and detaches all of its index memberships.
    fn detach(&mut self, result_id: &str) -> Option<CacheEntry> {
        let entry = self.results.remove(result_id)?;
        for key in &entry.source_keys {
            self.forget_membership(key, result_id);
        }
        Some(entry)
    }

    /// Drops `result_id` from one source key's set, pruning the set if it
    /// becomes empty.
    fn forget_membership(&mut self, key: &str, result_id: &str) {
        let emptied = match self.key_index.get_mut(key) {
            Some(dependents) => {
                dependents.remove(result_id);
                dependents.is_empty()
            }
            None => false,
        };
        if emptied {
            self.key_index.remove(key);
        }
    }

    /// Snapshot of all cached result-ids, for invariant checks.
    #[cfg(test)]
    pub(crate) fn result_ids(&self) -> Vec<String> {
        self.results.keys()
    }

    /// Source keys recorded for one entry, for invariant checks.
    #[cfg(test)]
    pub(crate) fn entry_source_keys(&self, result_id: &str) -> Option<Vec<String>> {
        self.results.get(result_id).map(|e| e.source_keys.clone())
    }

    /// Snapshot of all indexed source keys, for invariant checks.
    #[cfg(test)]
    pub(crate) fn indexed_keys(&self) -> Vec<String> {
        self.key_index.keys()
    }
}

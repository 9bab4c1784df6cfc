//! Backing Map Module
//!
//! Defines the minimal capability interface the cache's two maps are built
//! on, so an alternate backing structure (bounded, instrumented, ...) can
//! be substituted without touching the rest of the cache.
//!
//! A substitute must preserve standard associative-map semantics: unique
//! keys, amortized O(1) access, no silent loss. The construction-time
//! probe in [`validate_backend`] checks that contract on a throwaway
//! instance so a broken implementation fails fast with a descriptive
//! configuration error instead of corrupting state mid-operation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CacheError, Result};

// == Map Backend Trait ==
/// Minimal associative-map capability the cache requires.
///
/// Keys are strings (result identifiers or source keys); the value type
/// varies per map. Implementations must behave like a standard unique-key
/// map; eviction or other lossy behavior is a caller opt-in, not
/// something the cache defends against beyond the construction probe.
pub trait MapBackend<V>: Send {
    /// Returns a reference to the value stored under `key`.
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns a mutable reference to the value stored under `key`.
    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Stores `value` under `key`, returning the previous value if any.
    fn insert(&mut self, key: String, value: V) -> Option<V>;

    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);

    /// Snapshot of the stored keys, in no particular order.
    fn keys(&self) -> Vec<String>;

    /// Returns true if `key` is present.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == HashMap Backend ==
/// Default in-memory backing map over `std::collections::HashMap`.
#[derive(Debug, Default)]
pub struct HashMapBackend<V> {
    map: HashMap<String, V>,
}

impl<V> HashMapBackend<V> {
    /// Creates an empty backing map.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V: Send> MapBackend<V> for HashMapBackend<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.map.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    fn insert(&mut self, key: String, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        self.map.remove(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }
}

// == Map Factory ==
/// Constructor for a backing map, carried by the configuration.
///
/// Invoked once per map when the cache is built; shared (`Arc`) so a
/// configuration can be cloned into several cache instances.
pub type MapFactory<V> = Arc<dyn Fn() -> Box<dyn MapBackend<V>> + Send + Sync>;

/// Factory producing the default `HashMap`-backed map.
pub fn hash_map_factory<V: Send + 'static>() -> MapFactory<V> {
    Arc::new(|| Box::new(HashMapBackend::new()))
}

// == Construction-Time Validation ==
/// Probes a factory's product for standard associative-map semantics.
///
/// Builds one throwaway instance and exercises insert, lookup, overwrite,
/// removal, `len` and `clear` on reserved probe keys. Any deviation fails
/// with [`CacheError::InvalidConfig`] naming `what` (which of the cache's
/// maps was being configured) and the violated expectation.
///
/// # Arguments
/// * `factory` - The configured map constructor
/// * `what` - Human-readable name of the map being validated
pub fn validate_backend<V>(factory: &MapFactory<V>, what: &str) -> Result<()>
where
    V: Default + PartialEq,
{
    let fail = |detail: &str| CacheError::InvalidConfig(format!("{} {}", what, detail));

    let mut probe = factory();
    if probe.len() != 0 || !probe.is_empty() {
        return Err(fail("must start empty"));
    }

    if probe.insert("__probe:a".to_string(), V::default()).is_some() {
        return Err(fail("returned a previous value for a fresh key"));
    }
    if probe.get("__probe:a") != Some(&V::default()) {
        return Err(fail("did not return the stored value on lookup"));
    }
    if !probe.contains("__probe:a") || probe.len() != 1 {
        return Err(fail("lost an entry after insert"));
    }

    probe.insert("__probe:b".to_string(), V::default());
    if probe.len() != 2 {
        return Err(fail("did not keep two distinct keys"));
    }

    if probe.insert("__probe:a".to_string(), V::default()).is_none() {
        return Err(fail("did not report the previous value on overwrite"));
    }
    if probe.len() != 2 {
        return Err(fail("changed size on overwrite of an existing key"));
    }

    let mut listed = probe.keys();
    listed.sort();
    if listed != ["__probe:a", "__probe:b"] {
        return Err(fail("did not enumerate the stored keys"));
    }

    if probe.remove("__probe:a").is_none() {
        return Err(fail("did not return the removed value"));
    }
    if probe.get("__probe:a").is_some() || probe.len() != 1 {
        return Err(fail("still holds a removed key"));
    }
    if probe.remove("__probe:missing").is_some() {
        return Err(fail("returned a value for a key never stored"));
    }

    probe.clear();
    if probe.len() != 0 || !probe.keys().is_empty() {
        return Err(fail("is not empty after clear"));
    }

    Ok(())
}

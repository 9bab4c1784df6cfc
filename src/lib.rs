//! Sidecache - a server-assisted client-side read cache
//!
//! Serves repeated reads out of local memory and relies on invalidation
//! signals pushed by the remote store to remove every cached result a
//! write could have affected, without inspecting command semantics.

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;

pub use cache::{CacheStats, CacheStore, CachedValue};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use provider::{CacheProvider, CacheableRead, ClientSideCache, Invalidation};

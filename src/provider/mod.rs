//! Provider Module
//!
//! The transport-facing side of the cache: the read-through provider,
//! the capability trait it implements, and the invalidation event bus.

pub mod events;
pub mod interface;

mod cache_provider;

// Re-export public types
pub use cache_provider::CacheProvider;
pub use events::{Invalidation, InvalidationBus};
pub use interface::{CacheableRead, ClientSideCache, ReplyTransform, TRACKING_COMMAND};

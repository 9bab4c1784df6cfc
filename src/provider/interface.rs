//! Provider Interface Module
//!
//! The capability surface a transport integrates against: the description
//! of one cacheable read, the reply-transform hook, the tracking handshake
//! the transport must send upstream, and the [`ClientSideCache`] trait
//! implemented by the provider. Transports depend on the trait only, so
//! any conforming cache is substitutable.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::cache::key::result_key;
use crate::cache::{CacheStats, CachedValue};
use crate::provider::events::Invalidation;

/// Protocol instruction enabling server-pushed invalidations for the
/// issuing connection. The transport sends it verbatim during connection
/// setup, before the first cacheable read.
pub const TRACKING_COMMAND: [&str; 3] = ["CLIENT", "TRACKING", "ON"];

// == Reply Transform ==
/// Post-processing applied to a raw remote reply before it is cached.
///
/// Shared (`Arc`) so a read description stays cheaply cloneable; must be
/// pure, since it runs exactly once per miss and never on hits.
pub type ReplyTransform = Arc<dyn Fn(CachedValue) -> CachedValue + Send + Sync>;

// == Cacheable Read ==
/// Description of one read operation as the transport sees it.
///
/// `args` is the full ordered argument list and defines result identity:
/// two reads cache separately unless their argument lists are identical.
/// `source_keys` lists the keys the operation addresses and defines
/// invalidation identity.
#[derive(Clone)]
pub struct CacheableRead {
    /// Ordered raw arguments, command name included
    pub args: Vec<String>,
    /// Source keys the operation touches (may legitimately be empty)
    pub source_keys: Vec<String>,
    /// Optional reply post-processing applied before caching
    pub transform: Option<ReplyTransform>,
}

impl std::fmt::Debug for CacheableRead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheableRead")
            .field("args", &self.args)
            .field("source_keys", &self.source_keys)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl CacheableRead {
    /// Creates a read description with no reply transform.
    pub fn new(args: Vec<String>, source_keys: Vec<String>) -> Self {
        Self {
            args,
            source_keys,
            transform: None,
        }
    }

    /// Attaches a reply transform.
    pub fn with_transform(mut self, transform: ReplyTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The result identity of this read, derived from its argument list.
    pub fn result_id(&self) -> String {
        result_key(&self.args)
    }

    /// Applies the transform, if any, to a raw reply.
    pub fn transform_reply(&self, raw: CachedValue) -> CachedValue {
        match &self.transform {
            Some(transform) => transform(raw),
            None => raw,
        }
    }
}

// == Client-Side Cache Capability ==
/// What a transport needs from a client-side cache.
///
/// One implementation is [`CacheProvider`](crate::provider::CacheProvider);
/// tests substitute their own. The trait is meant for generic use
/// (`T: ClientSideCache`), not for trait objects, because the read-through
/// hook is generic over the transport's error and future types.
pub trait ClientSideCache: Send + Sync {
    /// The handshake the transport must send to enable server push.
    fn tracking_instruction(&self) -> &'static [&'static str] {
        &TRACKING_COMMAND
    }

    /// Serves a read from the cache, or executes `execute` remotely on a
    /// miss and caches its reply.
    ///
    /// A failed execution is propagated to the caller exactly as
    /// `execute` produced it; nothing is cached on failure.
    fn read_through<E, F, Fut>(
        &self,
        read: CacheableRead,
        execute: F,
    ) -> impl Future<Output = Result<CachedValue, E>> + Send
    where
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<CachedValue, E>> + Send;

    /// Consumes one invalidation signal pushed by the server. `None` is
    /// the wildcard meaning everything was invalidated.
    fn invalidate(&self, key: Option<&str>);

    /// Drops all cached state. Idempotent.
    fn reset(&self);

    /// Invoked by the transport when its connection errors.
    fn on_transport_error(&self);

    /// Invoked by the transport when its connection closes.
    fn on_transport_closed(&self);

    /// Number of cached results.
    fn entry_count(&self) -> usize;

    /// Immutable snapshot of the statistics counters.
    fn stats(&self) -> CacheStats;

    /// Subscribes to invalidation notifications.
    fn subscribe(&self) -> broadcast::Receiver<Invalidation>;
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tracking_command_literal() {
        assert_eq!(TRACKING_COMMAND, ["CLIENT", "TRACKING", "ON"]);
    }

    #[test]
    fn test_result_id_comes_from_argument_list() {
        let read = CacheableRead::new(
            vec!["GET".to_string(), "user:1".to_string()],
            vec!["user:1".to_string()],
        );
        assert_eq!(read.result_id(), "3_6_GET_user:1");
    }

    #[test]
    fn test_source_keys_do_not_affect_result_id() {
        let a = CacheableRead::new(vec!["GET".to_string(), "k".to_string()], vec![]);
        let b = CacheableRead::new(
            vec!["GET".to_string(), "k".to_string()],
            vec!["k".to_string()],
        );
        assert_eq!(a.result_id(), b.result_id());
    }

    #[test]
    fn test_transform_reply_without_transform_is_identity() {
        let read = CacheableRead::new(vec!["GET".to_string()], vec![]);
        assert_eq!(read.transform_reply(json!("raw")), json!("raw"));
    }

    #[test]
    fn test_transform_reply_applies_transform() {
        let read = CacheableRead::new(vec!["HGETALL".to_string()], vec![])
            .with_transform(Arc::new(|raw| json!({ "wrapped": raw })));
        assert_eq!(
            read.transform_reply(json!([1, 2])),
            json!({ "wrapped": [1, 2] })
        );
    }

    #[test]
    fn test_debug_hides_transform_body() {
        let read = CacheableRead::new(vec!["GET".to_string()], vec![])
            .with_transform(Arc::new(|raw| raw));
        let rendered = format!("{:?}", read);
        assert!(rendered.contains("transform: true"));
    }
}

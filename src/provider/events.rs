//! Invalidation Events Module
//!
//! Event types and fan-out plumbing for invalidation notifications.
//! Consumers subscribe for logging or metrics; the cache itself never
//! depends on anyone listening.

use tokio::sync::broadcast;

/// Per-subscriber buffer for invalidation events. A subscriber that
/// falls further behind than this observes a `Lagged` error instead of
/// blocking the cache.
pub const EVENT_CAPACITY: usize = 1024;

// == Invalidation Event ==
/// A single invalidation notification.
///
/// Emitted once per signal received from the transport, carrying the
/// signal itself rather than its local effect: a `Key` event is sent
/// even when no cached entry depended on that key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// One source key was invalidated.
    Key(String),
    /// The wildcard signal: everything was invalidated.
    Flush,
}

impl Invalidation {
    /// Returns the invalidated source key, or `None` for a flush.
    pub fn key(&self) -> Option<&str> {
        match self {
            Invalidation::Key(key) => Some(key),
            Invalidation::Flush => None,
        }
    }

    /// Returns true for the wildcard event.
    pub fn is_flush(&self) -> bool {
        matches!(self, Invalidation::Flush)
    }
}

impl std::fmt::Display for Invalidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invalidation::Key(key) => write!(f, "{}", key),
            Invalidation::Flush => write!(f, "*"),
        }
    }
}

// == Invalidation Bus ==
/// Broadcast fan-out for [`Invalidation`] events.
///
/// Wraps a `tokio::sync::broadcast` channel so emission is fire-and-forget:
/// sending with zero subscribers is a successful no-op, and a slow
/// subscriber only loses its own backlog.
#[derive(Debug)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Invalidation>,
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationBus {
    /// Creates a bus with the default per-subscriber capacity.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Opens a new subscription. Events emitted before this call are not
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.sender.subscribe()
    }

    /// Emits one event to all current subscribers.
    pub fn emit(&self, event: Invalidation) {
        tracing::debug!(%event, "invalidation event");
        // Err here only means nobody is subscribed.
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

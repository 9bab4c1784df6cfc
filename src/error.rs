//! Error types for the client-side cache
//!
//! Provides unified error handling using thiserror.
//!
//! The cache deliberately owns very few failure modes: remote read failures
//! stay in the caller's own error type and pass through the read-through
//! path untouched, and invalidation signals for unknown keys are silent
//! no-ops. What remains is configuration, checked once at construction.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the client-side cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A pluggable map implementation failed the construction-time
    /// contract check (standard associative-map semantics).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction and configuration.
pub type Result<T> = std::result::Result<T, CacheError>;

//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Cache misses are never
//! errors; these only cover construction and configuration.

use thiserror::Error;

use crate::factory::CacheKind;

// == Cache Error Enum ==
/// Unified error type for cache construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The requested kind is not a known eviction policy
    #[error("Unknown cache kind: {0}")]
    UnknownKind(String),

    /// The kind is known but has no implementation
    #[error("Cache policy not found: {0}")]
    PolicyNotFound(CacheKind),

    /// Capacity, TTL or sweep interval is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The background sweeper needs a running tokio runtime
    #[error("No tokio runtime available to run the sweeper")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

//! LRU/TTL Cache - an in-process key/value cache
//!
//! Provides least-recently-used eviction combined with per-entry TTL
//! expiration, lazy expiry on read and a background sweeper.

pub mod cache;
pub mod config;
pub mod error;
pub mod factory;
pub mod tasks;

pub use cache::{Cache, CacheStats, LruTtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use factory::{create_cache, create_cache_from_config, CacheKind};

//! Cache Factory
//!
//! Selects a cache implementation by policy name.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::error;

use crate::cache::{Cache, LruTtlCache};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Kind ==
/// Eviction policies a cache can be requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Entries expire by deadline only
    Timeout,
    /// Least recently used eviction with TTL expiration
    Lru,
    /// Least frequently used eviction
    Lfu,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Timeout => "timeout",
            CacheKind::Lru => "lru",
            CacheKind::Lfu => "lfu",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timeout" => Ok(CacheKind::Timeout),
            "lru" => Ok(CacheKind::Lru),
            "lfu" => Ok(CacheKind::Lfu),
            _ => Err(CacheError::UnknownKind(s.to_string())),
        }
    }
}

// == Create Cache ==
/// Creates a cache of the named kind with the default sweep interval.
///
/// Only `lru` is implemented; other kinds are logged and rejected.
pub fn create_cache<V>(kind: &str, capacity: usize, default_ttl: Duration) -> Result<Arc<dyn Cache<V>>>
where
    V: Clone + Send + Sync + 'static,
{
    let config = CacheConfig {
        kind: kind.to_string(),
        ..CacheConfig::new(capacity, default_ttl)
    };
    create_cache_from_config(&config)
}

/// Creates a cache from a full configuration.
pub fn create_cache_from_config<V>(config: &CacheConfig) -> Result<Arc<dyn Cache<V>>>
where
    V: Clone + Send + Sync + 'static,
{
    let kind = config.kind.parse::<CacheKind>().map_err(|err| {
        error!(kind = %config.kind, "Cache kind does not exist");
        err
    })?;

    match kind {
        CacheKind::Lru => Ok(Arc::new(LruTtlCache::<V>::from_config(config)?)),
        other => {
            error!(kind = %other, "No implementation for cache policy");
            Err(CacheError::PolicyNotFound(other))
        }
    }
}

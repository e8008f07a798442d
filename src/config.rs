//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment
//! variables.

use std::env;
use std::time::Duration;

use serde::Serialize;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheConfig {
    /// Eviction policy name, resolved by the factory
    pub kind: String,
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Base TTL for entries written without an explicit TTL
    pub default_ttl: Duration,
    /// Background sweep interval, None = half the default TTL
    pub sweep_interval: Option<Duration>,
    /// Whether deadlines get a random additive offset
    pub jitter: bool,
}

impl CacheConfig {
    /// Creates a config for the given capacity and TTL, other fields default.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            capacity,
            default_ttl,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_KIND` - Eviction policy (default: lru)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: half the TTL)
    /// - `CACHE_JITTER` - Enable deadline jitter (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            kind: env::var("CACHE_KIND").unwrap_or(defaults.kind),
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            default_ttl: parse_var("CACHE_DEFAULT_TTL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("CACHE_SWEEP_INTERVAL_MS").map(Duration::from_millis),
            jitter: parse_var("CACHE_JITTER").unwrap_or(defaults.jitter),
        }
    }

    /// Returns the effective sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval.unwrap_or(self.default_ttl / 2)
    }

    /// Rejects values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default TTL must be greater than 0".to_string(),
            ));
        }
        if self.sweep_interval().is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            kind: "lru".to_string(),
            capacity: 1000,
            default_ttl: Duration::from_secs(300),
            sweep_interval: None,
            jitter: true,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

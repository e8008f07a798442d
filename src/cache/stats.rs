//! Cache Statistics Module
//!
//! Counters kept by the engine. Lookups split into hits and misses; removals
//! split into capacity evictions and deadline expirations.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the engine counters.
///
/// An expired entry found by `get` counts both as a miss and as an
/// expiration. Entries removed by the sweeper only count as expirations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing, or found an expired entry
    pub misses: u64,
    /// Tail entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries dropped because their deadline passed, lazily or by a sweep
    pub expirations: u64,
    /// Entries linked in the recency list when the snapshot was taken
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `get` calls observed.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub(crate) fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub(crate) fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

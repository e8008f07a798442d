//! Cache Entry Module
//!
//! Defines the payload carried by each recency-list node.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached key/value pair and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key under which the entry is indexed
    pub key: String,
    /// The stored value
    pub value: V,
    /// Expiration instant, None = never expires
    pub deadline: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry with an already computed deadline.
    pub fn new(key: String, value: V, deadline: Option<Instant>) -> Self {
        Self {
            key,
            value,
            deadline,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired relative to `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= deadline`, so an
    /// entry written with a zero TTL (and no jitter) is never readable.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    /// Checks if the entry has expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry is still live
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

// == Deadline Computation ==
/// Number of distinct jitter steps drawn per write.
pub const JITTER_STEPS: u32 = 100;

/// Each jitter step adds `ttl / JITTER_DIVISOR`, so the largest offset is
/// `ttl * 99 / 500`, just under 20% of the base TTL.
pub const JITTER_DIVISOR: u32 = 500;

/// Computes the additive jitter for a given step in `0..JITTER_STEPS`.
pub fn jitter_for(ttl: Duration, step: u32) -> Duration {
    ttl / JITTER_DIVISOR * step.min(JITTER_STEPS - 1)
}

/// Computes `now + ttl + jitter`.
///
/// Returns None when the sum does not fit the clock, which callers treat as
/// an entry that never expires.
pub fn deadline_from(now: Instant, ttl: Duration, jitter: Duration) -> Option<Instant> {
    ttl.checked_add(jitter)
        .and_then(|lifetime| now.checked_add(lifetime))
}

//! Cache Store Module
//!
//! Main cache engine combining the recency list, the key index and TTL
//! expiration. All operations take `&mut self`; sharing across threads is
//! the job of [`LruTtlCache`](crate::cache::LruTtlCache).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, trace};

use crate::cache::entry::{deadline_from, jitter_for, JITTER_STEPS};
use crate::cache::{CacheEntry, CacheStats, NodeId, RecencyList};

/// Upper bound on slots reserved up front, whatever the capacity.
const PREALLOCATE_LIMIT: usize = 4096;

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// A key is present in `index` if and only if its node is linked into
/// `list`, and `index.len() == list.len() <= capacity` between calls.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Nodes ordered by recency
    list: RecencyList<V>,
    /// Key -> node lookup
    index: HashMap<String, NodeId>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Base TTL for entries written with `put`
    default_ttl: Duration,
    /// Whether deadlines get a random additive offset
    jitter: bool,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and default TTL.
    ///
    /// Jitter is enabled.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let reserve = capacity.min(PREALLOCATE_LIMIT);
        Self {
            list: RecencyList::with_capacity(reserve),
            index: HashMap::with_capacity(reserve),
            stats: CacheStats::new(),
            capacity,
            default_ttl,
            jitter: true,
        }
    }

    /// Enables or disables deadline jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns None when the key is absent or expired. Expired entries are
    /// removed on the spot; live entries are promoted to most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let Some(&id) = self.index.get(key) else {
            trace!(key, "cache miss");
            self.stats.record_lookup(false);
            return None;
        };

        let expired = self
            .list
            .get(id)
            .map_or(true, |entry| entry.is_expired_at(Instant::now()));
        if expired {
            trace!(key, "cache entry expired, removing lazily");
            self.remove_node(key, id);
            self.stats.record_expirations(1);
            self.stats.record_lookup(false);
            return None;
        }

        trace!(key, "cache hit");
        self.stats.record_lookup(true);
        self.list.promote(id);
        self.list.get(id).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores `value` under `key` with the default TTL.
    ///
    /// An existing key is updated in place and promoted; a new key is
    /// inserted at the front and, if that pushes the cache over capacity,
    /// the least recently used entry is evicted.
    pub fn put(&mut self, key: &str, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Stores `value` under `key` with an explicit base TTL.
    ///
    /// Jitter is applied on top of `ttl` the same way as for `put`.
    pub fn put_with_ttl(&mut self, key: &str, value: V, ttl: Duration) {
        let deadline = self.deadline_for(ttl);

        if let Some(&id) = self.index.get(key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
                entry.deadline = deadline;
                self.list.promote(id);
                return;
            }
            // Index pointed at a dead node; drop it and insert fresh
            self.index.remove(key);
        }

        let id = self
            .list
            .insert_front(CacheEntry::new(key.to_string(), value, deadline));
        self.index.insert(key.to_string(), id);

        self.enforce_capacity();
        self.stats.set_total_entries(self.index.len());
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether an entry was removed; deleting an absent key is a
    /// no-op.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&id) => {
                self.remove_node(key, id);
                true
            }
            None => false,
        }
    }

    // == Contains ==
    /// Checks whether `key` holds a live entry.
    ///
    /// Unlike `get`, this neither promotes nor removes anything.
    pub fn contains(&self, key: &str) -> bool {
        self.peek_entry(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == TTL Remaining ==
    /// Returns the remaining lifetime of a live entry.
    ///
    /// `Some(Duration::MAX)` means the entry never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entry = self.peek_entry(key)?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.ttl_remaining().unwrap_or(Duration::MAX))
    }

    // == Sweep ==
    /// Runs one sweeper pass if the cache is at least half full.
    ///
    /// Returns None when the pass was skipped, otherwise the number of
    /// entries removed.
    pub fn run_sweep(&mut self) -> Option<usize> {
        if self.list.len() < self.capacity / 2 {
            trace!(
                len = self.list.len(),
                capacity = self.capacity,
                "occupancy below half capacity, skipping sweep"
            );
            return None;
        }

        Some(self.sweep_expired())
    }

    /// Removes expired entries starting from the least recently used end.
    ///
    /// The walk stops at the first live entry, so an expired entry sitting
    /// in front of a live one survives until it is read.
    pub fn sweep_expired(&mut self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        while let Some(id) = self.list.back() {
            let Some(entry) = self.list.get(id) else {
                break;
            };
            if !entry.is_expired_at(now) {
                break;
            }
            let key = entry.key.clone();
            self.remove_node(&key, id);
            removed += 1;
        }

        self.stats.record_expirations(removed);
        if removed > 0 {
            debug!(removed, remaining = self.list.len(), "swept expired entries");
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
        self.stats.set_total_entries(0);
    }
}

impl<V> CacheStore<V> {
    // == Accessors ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// Returns keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }

    fn peek_entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.index.get(key).and_then(|&id| self.list.get(id))
    }

    fn remove_node(&mut self, key: &str, id: NodeId) {
        self.list.unlink(id);
        self.index.remove(key);
        self.stats.set_total_entries(self.index.len());
    }

    /// Evicts the tail-adjacent entry while the cache is over capacity.
    ///
    /// Only one new node is inserted per write, so this removes at most one
    /// entry in practice.
    fn enforce_capacity(&mut self) {
        while self.list.len() > self.capacity {
            let Some(id) = self.list.back() else {
                break;
            };
            let Some(entry) = self.list.unlink(id) else {
                break;
            };
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(key = %entry.key, capacity = self.capacity, "evicted least recently used entry");
        }
    }

    fn deadline_for(&self, ttl: Duration) -> Option<Instant> {
        let jitter = if self.jitter {
            jitter_for(ttl, rand::thread_rng().gen_range(0..JITTER_STEPS))
        } else {
            Duration::ZERO
        };
        deadline_from(Instant::now(), ttl, jitter)
    }
}

#[cfg(test)]
impl<V> CacheStore<V> {
    /// Checks that the key index and the recency list describe the same set
    /// of nodes.
    pub(crate) fn is_consistent(&self) -> bool {
        if self.index.len() != self.list.len() || self.list.iter().count() != self.list.len() {
            return false;
        }
        self.list.iter().all(|entry| {
            self.index
                .get(&entry.key)
                .and_then(|&id| self.list.get(id))
                .is_some_and(|indexed| std::ptr::eq(indexed, entry))
        })
    }
}

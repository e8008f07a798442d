//! LRU/TTL Cache Handle
//!
//! Thread-safe, cloneable front for [`CacheStore`] that also owns the
//! background sweeper.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::{Cache, CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper, SweeperGuard};

// == LRU TTL Cache ==
/// Shared LRU cache with per-entry TTL.
///
/// Every read that can change recency order (`get`) takes the write lock, so
/// promotion and lazy expiry never race with other callers or the sweeper.
/// Side-effect-free accessors take the read lock.
///
/// Clones share the same store and sweeper. The sweeper is aborted when the
/// last clone is dropped.
pub struct LruTtlCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    sweeper: Option<Arc<SweeperGuard>>,
}

impl<V> Clone for LruTtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: self.sweeper.clone(),
        }
    }
}

impl<V> std::fmt::Debug for LruTtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.read();
        f.debug_struct("LruTtlCache")
            .field("len", &store.len())
            .field("capacity", &store.capacity())
            .field("default_ttl", &store.default_ttl())
            .field("sweeper", &self.sweeper.is_some())
            .finish()
    }
}

impl<V> LruTtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache and starts its sweeper at half the default TTL.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity, default_ttl))
    }

    /// Creates a cache from a validated configuration and starts its sweeper.
    ///
    /// The `kind` field is ignored here; policy selection belongs to
    /// [`create_cache_from_config`](crate::factory::create_cache_from_config).
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::NoRuntime);
        }

        let store = Arc::new(RwLock::new(Self::build_store(config)));
        let interval = config.sweep_interval();
        let handle = spawn_sweeper(Arc::downgrade(&store), interval);

        info!(
            capacity = config.capacity,
            default_ttl_ms = config.default_ttl.as_millis() as u64,
            sweep_interval_ms = interval.as_millis() as u64,
            "LRU/TTL cache created"
        );

        Ok(Self {
            store,
            sweeper: Some(Arc::new(SweeperGuard::new(handle))),
        })
    }

    /// Creates a cache that only expires entries lazily, on read.
    ///
    /// Needs no runtime; `run_sweep` can still be called by hand.
    pub fn without_sweeper(capacity: usize, default_ttl: Duration) -> Result<Self> {
        let config = CacheConfig::new(capacity, default_ttl);
        config.validate()?;

        Ok(Self {
            store: Arc::new(RwLock::new(Self::build_store(&config))),
            sweeper: None,
        })
    }

    fn build_store(config: &CacheConfig) -> CacheStore<V> {
        CacheStore::new(config.capacity, config.default_ttl).with_jitter(config.jitter)
    }

    // == Operations ==
    /// Retrieves a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.write().get(key)
    }

    /// Stores `value` under `key` with the default TTL.
    pub fn put(&self, key: &str, value: V) {
        self.store.write().put(key, value);
    }

    /// Stores `value` under `key` with an explicit base TTL.
    pub fn put_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        self.store.write().put_with_ttl(key, value, ttl);
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.store.write().delete(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.read().contains(key)
    }

    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.store.read().ttl_remaining(key)
    }

    /// Runs one sweeper pass immediately.
    pub fn run_sweep(&self) -> Option<usize> {
        self.store.write().run_sweep()
    }

    pub fn clear(&self) {
        self.store.write().clear();
    }
}

impl<V> LruTtlCache<V> {
    // == Accessors ==
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    pub fn default_ttl(&self) -> Duration {
        self.store.read().default_ttl()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.read().stats()
    }

    /// Returns keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.store.read().keys()
    }

    // == Sweeper Lifecycle ==
    /// Returns whether a background sweeper is still running.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    /// Stops the background sweeper for every clone of this cache.
    ///
    /// Cached entries stay readable and keep expiring lazily.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.abort();
            info!("LRU/TTL cache sweeper shut down");
        }
    }
}

impl<V> Cache<V> for LruTtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &str) -> Option<V> {
        LruTtlCache::get(self, key)
    }

    fn put(&self, key: &str, value: V) {
        LruTtlCache::put(self, key, value);
    }

    fn delete(&self, key: &str) {
        LruTtlCache::delete(self, key);
    }

    fn len(&self) -> usize {
        LruTtlCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruTtlCache::capacity(self)
    }

    fn default_ttl(&self) -> Duration {
        LruTtlCache::default_ttl(self)
    }

    fn stats(&self) -> CacheStats {
        LruTtlCache::stats(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn lazy_cache(capacity: usize) -> LruTtlCache<String> {
        LruTtlCache::without_sweeper(capacity, Duration::from_secs(300)).unwrap()
    }

    #[test]
    fn test_without_sweeper_needs_no_runtime() {
        let cache = lazy_cache(10);

        cache.put("a", "A".to_string());

        assert_eq!(cache.get("a"), Some("A".to_string()));
        assert!(!cache.has_sweeper());
        assert_eq!(cache.capacity(), 10);
        assert_eq!(cache.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = LruTtlCache::<String>::new(10, Duration::from_secs(1));
        assert_eq!(result.unwrap_err(), CacheError::NoRuntime);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            LruTtlCache::<String>::without_sweeper(0, Duration::from_secs(1)),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let cache = lazy_cache(10);
        let other = cache.clone();

        other.put("shared", "value".to_string());

        assert_eq!(cache.get("shared"), Some("value".to_string()));
        assert!(cache.delete("shared"));
        assert!(!other.contains("shared"));
    }

    #[test]
    fn test_clear_empties_all_clones() {
        let cache = lazy_cache(10);
        let other = cache.clone();

        for key in ["a", "b", "c"] {
            cache.put(key, key.to_string());
        }
        assert_eq!(cache.get("a"), Some("a".to_string()));

        other.clear();

        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());
        assert!(!cache.contains("b"));
        assert_eq!(cache.get("c"), None);

        // Counters survive a clear
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 0);

        cache.put("d", "d".to_string());
        assert_eq!(other.keys(), vec!["d".to_string()]);
        assert!(cache.store.read().is_consistent());
    }

    #[test]
    fn test_concurrent_access_keeps_invariants() {
        let cache = lazy_cache(16);
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("k{}", (t * 7 + i) % 40);
                        match i % 3 {
                            0 => cache.put(&key, key.clone()),
                            1 => {
                                if let Some(value) = cache.get(&key) {
                                    assert_eq!(value, key);
                                }
                            }
                            _ => {
                                cache.delete(&key);
                            }
                        }
                        assert!(cache.len() <= cache.capacity());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 16);
        assert!(cache.store.read().is_consistent());
    }

    #[test]
    fn test_wrap_get_reads_through() {
        let cache = lazy_cache(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let get = cache.wrap_get(move |key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("{key}!")
        });

        assert_eq!(get("a"), "a!");
        assert_eq!(get("a"), "a!");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("a"), Some("a!".to_string()));
    }

    #[test]
    fn test_wrap_put_invalidates_after_write() {
        let cache = lazy_cache(10);
        let backing = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&backing);

        cache.put("a", "stale".to_string());
        let put = cache.wrap_put(move |key: &str, value: String| {
            sink.lock().push((key.to_string(), value));
        });

        put("a", "fresh".to_string());

        assert!(!cache.contains("a"));
        assert_eq!(backing.lock().as_slice(), &[("a".to_string(), "fresh".to_string())]);
    }

    #[test]
    fn test_wrap_delete_invalidates_after_remove() {
        let cache = lazy_cache(10);
        let removed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&removed);

        cache.put("a", "A".to_string());
        let delete = cache.wrap_delete(move |_key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        delete("a");
        delete("a");

        assert!(!cache.contains("a"));
        assert_eq!(removed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeper() {
        let cache = LruTtlCache::<String>::new(10, Duration::from_secs(1)).unwrap();
        assert!(cache.has_sweeper());

        cache.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!cache.has_sweeper());
        cache.put("still", "works".to_string());
        assert_eq!(cache.get("still"), Some("works".to_string()));
    }
}

//! Integration Tests for the cache
//!
//! Drives the public API end to end, sweeper included.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lru_ttl_cache::{
    create_cache, create_cache_from_config, Cache, CacheConfig, CacheError, CacheKind, LruTtlCache,
};
use tokio_test::{assert_err, assert_ok};

// == Helper Functions ==

fn lazy_cache(capacity: usize, ttl: Duration) -> LruTtlCache<String> {
    LruTtlCache::without_sweeper(capacity, ttl).unwrap()
}

// == Eviction ==

#[test]
fn test_capacity_evicts_least_recently_used() {
    let cache = lazy_cache(3, Duration::from_secs(60));

    for key in ["a", "b", "c", "d"] {
        cache.put(key, key.to_string());
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.keys(), vec!["d", "c", "b"]);
}

#[test]
fn test_get_promotes_entry_past_eviction() {
    let cache = lazy_cache(5, Duration::from_secs(60));

    cache.put("a", "A".to_string());
    cache.put("b", "B".to_string());
    assert_eq!(cache.get("a"), Some("A".to_string()));
    for key in ["c", "d", "e", "f"] {
        cache.put(key, key.to_uppercase());
    }

    assert_eq!(cache.len(), 5);
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some("A".to_string()));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_len_never_exceeds_capacity() {
    let cache = lazy_cache(7, Duration::from_secs(60));

    for i in 0..100 {
        cache.put(&format!("key{}", i % 23), i.to_string());
        assert!(cache.len() <= cache.capacity());
    }
}

// == Expiration ==

#[test]
fn test_expired_entry_is_not_found_without_sweeper() {
    let cache = lazy_cache(5, Duration::from_secs(1));

    cache.put("a", "A".to_string());
    std::thread::sleep(Duration::from_millis(1500));

    assert_eq!(cache.get("a"), None);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_sweeper_clears_stale_entries() {
    let config = CacheConfig {
        sweep_interval: Some(Duration::from_millis(25)),
        jitter: false,
        ..CacheConfig::new(4, Duration::from_millis(50))
    };
    let cache = assert_ok!(LruTtlCache::<String>::from_config(&config));

    for key in ["a", "b", "c"] {
        cache.put(key, key.to_string());
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.len(), 0, "sweeper should have removed every entry");
    assert_eq!(cache.stats().expirations, 3);
}

#[tokio::test]
async fn test_clone_keeps_sweeper_running() {
    let cache = assert_ok!(LruTtlCache::<String>::new(4, Duration::from_millis(40)));
    let clone = cache.clone();

    drop(cache);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(clone.has_sweeper(), "a live clone keeps the sweeper running");

    clone.shutdown();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!clone.has_sweeper());
}

// == Delete ==

#[test]
fn test_delete_twice_matches_single_delete() {
    let cache = lazy_cache(5, Duration::from_secs(60));

    cache.put("a", "A".to_string());
    cache.put("b", "B".to_string());

    assert!(cache.delete("a"));
    let after_first = cache.keys();
    assert!(!cache.delete("a"));

    assert_eq!(cache.keys(), after_first);
    assert_eq!(cache.len(), 1);
}

// == Wrap Adapters ==

#[test]
fn test_wrap_get_caches_fetch_result() {
    let cache = lazy_cache(5, Duration::from_secs(60));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let get = cache.wrap_get(move |key: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        format!("{key}!")
    });

    assert_eq!(get("k"), "k!");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get("k"), Some("k!".to_string()));

    assert_eq!(get("k"), "k!");
    assert_eq!(calls.load(Ordering::SeqCst), 1, "second call must be served from cache");
}

#[tokio::test]
async fn test_factory_cache_wrappers() {
    let cache = assert_ok!(create_cache::<String>("lru", 5, Duration::from_secs(60)));
    let writes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&writes);

    let get = cache.wrap_get(|key: &str| key.to_uppercase());
    let put = cache.wrap_put(move |_key: &str, _value: String| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let delete = cache.wrap_delete(|_key: &str| {});

    assert_eq!(get("x"), "X");
    assert_eq!(cache.len(), 1);

    put("x", "new".to_string());
    assert_eq!(writes.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get("x"), None, "write must invalidate the cached copy");

    assert_eq!(get("x"), "X");
    assert_eq!(get("x"), "X");
    delete("x");
    assert!(cache.is_empty());

    // Three misses (two through `get`, one direct), then one hit
    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.expirations, 0);
    assert_eq!(stats.total_entries, 0);
    assert_eq!(stats.hit_rate(), 0.25);
}

// == Factory ==

#[tokio::test]
async fn test_factory_rejects_unsupported_kinds() {
    let err = assert_err!(create_cache::<String>("lfu", 5, Duration::from_secs(1)));
    assert_eq!(err, CacheError::PolicyNotFound(CacheKind::Lfu));

    let err = assert_err!(create_cache::<String>("random", 5, Duration::from_secs(1)));
    assert!(matches!(err, CacheError::UnknownKind(_)));
}

#[tokio::test]
async fn test_factory_validates_config() {
    let config = CacheConfig::new(0, Duration::from_secs(1));
    let err = assert_err!(create_cache_from_config::<String>(&config));
    assert!(matches!(err, CacheError::InvalidConfig(_)));
}

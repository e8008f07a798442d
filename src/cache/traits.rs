//! Cache Trait
//!
//! The operation surface every cache policy exposes, plus the adapters that
//! put a cache in front of an uncached fetch/write/delete function.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStats;

/// Read-through function returned by [`Cache::wrap_get`].
pub type GetFn<V> = Box<dyn Fn(&str) -> V + Send + Sync>;
/// Write function returned by [`Cache::wrap_put`].
pub type PutFn<V> = Box<dyn Fn(&str, V) + Send + Sync>;
/// Delete function returned by [`Cache::wrap_delete`].
pub type DeleteFn = Box<dyn Fn(&str) + Send + Sync>;

// == Cache Trait ==
pub trait Cache<V>: fmt::Debug + Send + Sync {
    /// Returns a copy of the live value under `key`, or None on a miss.
    fn get(&self, key: &str) -> Option<V>;

    /// Inserts or replaces the value under `key` using the default TTL.
    fn put(&self, key: &str, value: V);

    /// Removes `key`. Absent keys are ignored.
    fn delete(&self, key: &str);

    /// Returns the number of cached entries, expired-but-unswept included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;

    /// Returns the base TTL applied by `put`.
    fn default_ttl(&self) -> Duration;

    /// Returns a snapshot of lookup and removal counters.
    fn stats(&self) -> CacheStats;

    // == Wrap Adapters ==
    /// Wraps an uncached fetch into a read-through lookup.
    ///
    /// On a miss the fetch result is stored and returned. Concurrent misses
    /// on one key may each call `fetch`.
    fn wrap_get<F>(&self, fetch: F) -> GetFn<V>
    where
        Self: Clone + Sized + 'static,
        F: Fn(&str) -> V + Send + Sync + 'static,
        V: Clone + 'static,
    {
        let cache = self.clone();
        Box::new(move |key: &str| {
            if let Some(value) = cache.get(key) {
                return value;
            }
            let value = fetch(key);
            cache.put(key, value.clone());
            value
        })
    }

    /// Wraps an uncached write so that the cached copy is invalidated after
    /// the write goes through.
    fn wrap_put<F>(&self, write: F) -> PutFn<V>
    where
        Self: Clone + Sized + 'static,
        F: Fn(&str, V) + Send + Sync + 'static,
        V: 'static,
    {
        let cache = self.clone();
        Box::new(move |key: &str, value: V| {
            write(key, value);
            cache.delete(key);
        })
    }

    /// Wraps an uncached delete so that the cached copy is invalidated after
    /// the backing delete.
    fn wrap_delete<F>(&self, remove: F) -> DeleteFn
    where
        Self: Clone + Sized + 'static,
        F: Fn(&str) + Send + Sync + 'static,
        V: 'static,
    {
        let cache = self.clone();
        Box::new(move |key: &str| {
            remove(key);
            cache.delete(key);
        })
    }
}

impl<V, C> Cache<V> for Arc<C>
where
    C: Cache<V> + ?Sized,
{
    fn get(&self, key: &str) -> Option<V> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: V) {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) {
        (**self).delete(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn default_ttl(&self) -> Duration {
        (**self).default_ttl()
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}

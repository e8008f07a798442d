//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod list;
mod lru_ttl;
mod stats;
mod store;
mod traits;


// Re-export public types
pub use entry::CacheEntry;
pub use list::{NodeId, RecencyList};
pub use lru_ttl::LruTtlCache;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use traits::{Cache, DeleteFn, GetFn, PutFn};

//! Expired Entry Sweeper
//!
//! Background task that periodically removes expired entries once the cache
//! is at least half full.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task only holds a weak reference to the store: it stops on its own
/// once every strong reference is gone. Each pass takes the write lock for
/// its whole duration.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(1000, Duration::from_secs(60))));
/// let handle = spawn_sweeper(Arc::downgrade(&store), Duration::from_secs(30));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweeper<V>(store: Weak<RwLock<CacheStore<V>>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting cache sweeper"
        );

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                break;
            };
            let swept = store.write().run_sweep();
            drop(store);

            match swept {
                Some(removed) if removed > 0 => {
                    debug!(removed, "Sweeper pass removed expired entries");
                }
                Some(_) => trace!("Sweeper pass found nothing to remove"),
                None => trace!("Sweeper pass skipped"),
            }
        }

        info!("Cache dropped, sweeper stopped");
    })
}

// == Sweeper Guard ==
/// Owns a sweeper task and aborts it when dropped.
#[derive(Debug)]
pub struct SweeperGuard {
    handle: JoinHandle<()>,
}

impl SweeperGuard {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Stops the sweeper now instead of waiting for the guard to drop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweeperGuard {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Aborting cache sweeper");
            self.handle.abort();
        }
    }
}

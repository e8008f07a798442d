//! LRU/TTL Cache demo
//!
//! Builds a cache from environment configuration, runs a short read-through
//! demonstration, then keeps the sweeper running until shutdown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl_cache::{create_cache_from_config, Cache, CacheConfig};

/// Main entry point for the cache demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache through the factory (starts the sweeper)
/// 4. Exercise put/get and a read-through wrapper
/// 5. Wait for SIGINT/SIGTERM, then drop the cache to stop the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&config).context("failed to serialize configuration")?
    );

    let cache = create_cache_from_config::<String>(&config).context("failed to create cache")?;

    for key in ["a", "b", "c", "d", "e"] {
        cache.put(key, key.repeat(2));
    }
    info!(hit = ?cache.get("a"), miss = ?cache.get("z"), "Direct lookups");

    let backing_reads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&backing_reads);
    let get_with_cache = cache.wrap_get(move |key: &str| {
        counter.fetch_add(1, Ordering::Relaxed);
        format!("{key}!")
    });
    for key in ["x", "x", "y", "x"] {
        info!(key, value = %get_with_cache(key), "Read-through lookup");
    }

    info!(
        "Cache state: {}",
        json!({
            "len": cache.len(),
            "capacity": cache.capacity(),
            "default_ttl_ms": cache.default_ttl().as_millis() as u64,
            "backing_reads": backing_reads.load(Ordering::Relaxed),
        })
    );

    let stats = cache.stats();
    info!(
        hit_rate = stats.hit_rate(),
        "Cache stats: {}",
        serde_json::to_string(&stats).context("failed to serialize stats")?
    );

    shutdown_signal().await;

    drop(get_with_cache);
    drop(cache);
    info!("Cache dropped, shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(%err, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

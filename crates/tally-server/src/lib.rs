pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod observability;
pub mod server;
pub mod usage;

pub use config::{
    AppConfig, BackendsConfig, CacheConfig, LoggingConfig, RedisConfig, ServerConfig,
};
pub use error::UsageError;
pub use observability::{init_tracing, init_tracing_with_level};
pub use server::{AppState, TallyServer, build_app};
pub use usage::UsageService;

use std::sync::Arc;
use std::time::Duration;

use tally_cache::{DynSnapshotStore, MemorySnapshotStore, RedisSnapshotStore};

/// Create the persistent snapshot store based on configuration.
///
/// ## Store Modes
///
/// - **Redis disabled**: in-memory store, local to this instance
/// - **Redis enabled**: shared Redis store, verified with a ping
///
/// ## Graceful Degradation
///
/// If Redis cannot be reached at startup the server still comes up on the
/// in-memory store; every instance then recomputes for itself until Redis
/// returns and the process restarts.
pub async fn create_snapshot_store(config: &RedisConfig) -> DynSnapshotStore {
    if !config.enabled {
        tracing::info!("Redis disabled, using in-memory snapshot store");
        return Arc::new(MemorySnapshotStore::new());
    }

    tracing::info!(url = %config.url, "Connecting to Redis snapshot store");
    let timeout = Duration::from_millis(config.timeout_ms);
    match RedisSnapshotStore::connect(&config.url, config.pool_size, timeout) {
        Ok(store) => match store.ping().await {
            Ok(()) => Arc::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "Redis unreachable, falling back to in-memory snapshot store");
                Arc::new(MemorySnapshotStore::new())
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Redis pool creation failed, falling back to in-memory snapshot store");
            Arc::new(MemorySnapshotStore::new())
        }
    }
}

//! Redis-backed persistent snapshot store.
//!
//! Entries are stored as JSON under their singleton key with no Redis-side
//! TTL: expiry lives inside the entry and is enforced by the reader.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Pool, Runtime};
use redis::AsyncCommands;

use crate::error::StoreError;
use crate::store::{CacheEntry, SnapshotStore};

/// Snapshot store backed by a shared Redis instance.
pub struct RedisSnapshotStore {
    pool: Pool,
}

impl RedisSnapshotStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `url` and wraps it.
    pub fn connect(url: &str, pool_size: usize, timeout: Duration) -> Result<Self, StoreError> {
        let mut config = deadpool_redis::Config::from_url(url);
        let pool_config = config.pool.get_or_insert_with(Default::default);
        pool_config.max_size = pool_size;
        pool_config.timeouts.wait = Some(timeout);
        pool_config.timeouts.create = Some(timeout);
        pool_config.timeouts.recycle = Some(timeout);

        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::connection(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Round-trips a PING to verify the store is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        let payload = serde_json::to_string(entry)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        conn.set::<_, _, ()>(&entry.key, payload)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        tracing::debug!(key = %entry.key, "snapshot written to redis");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

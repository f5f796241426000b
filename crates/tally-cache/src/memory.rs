//! In-memory snapshot store for single-instance deployments and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{CacheEntry, SnapshotStore};

/// Snapshot store kept entirely in process memory.
///
/// Implements the same contract as the durable stores, so the orchestrator
/// does not care which one it is talking to. Not shared across instances.
#[derive(Default)]
pub struct MemorySnapshotStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{UsageSnapshot, UsageStats};
    use time::Duration;
    use time::macros::datetime;

    fn snapshot(expires_at: time::OffsetDateTime) -> UsageSnapshot {
        UsageSnapshot::new(
            UsageStats {
                confirmed_users: 1,
                monthly_active_users: 2,
                weekly_active_users: 3,
            },
            expires_at,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let store = MemorySnapshotStore::new();
        assert!(store.get("usage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let store = MemorySnapshotStore::new();
        let entry = CacheEntry::new("usage", snapshot(datetime!(2024-05-02 00:00:00 UTC)));
        store.put(&entry).await.unwrap();
        assert_eq!(store.get("usage").await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_put_is_a_full_overwrite() {
        let store = MemorySnapshotStore::new();
        let first = CacheEntry::new("usage", snapshot(datetime!(2024-05-02 00:00:00 UTC)));
        let second = CacheEntry::new(
            "usage",
            snapshot(datetime!(2024-05-02 00:00:00 UTC) + Duration::hours(24)),
        );
        store.put(&first).await.unwrap();
        store.put(&second).await.unwrap();
        assert_eq!(store.get("usage").await.unwrap(), Some(second));
    }
}

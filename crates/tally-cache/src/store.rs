//! The persistent snapshot store abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::StoreError;
use tally_core::UsageSnapshot;

/// A stored snapshot plus its expiry instant.
///
/// Exactly one logical entry exists system-wide, under a well-known singleton
/// key. It is created or overwritten only by a successful recompute and never
/// explicitly deleted: expiry is advisory and enforced by the reader, not the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub data: UsageSnapshot,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl CacheEntry {
    /// Wraps a snapshot for storage under `key`. The entry expiry mirrors the
    /// snapshot's own.
    pub fn new(key: impl Into<String>, data: UsageSnapshot) -> Self {
        let expires_at = data.expires_at;
        Self {
            key: key.into(),
            data,
            expires_at,
        }
    }

    /// Whether the entry may still be served at `now`.
    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        now <= self.expires_at
    }
}

/// Durable key-value store shared by every process instance.
///
/// Implementations must be thread-safe (`Send + Sync`). No transaction or
/// at-most-one-writer guarantee is required: `put` is a blind full overwrite
/// and the last writer wins.
///
/// # Errors
///
/// Callers treat a `get` failure as a cache miss and a `put` failure as
/// log-and-continue; implementations should surface [`StoreError`] rather
/// than panic.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the entry stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Overwrites the entry stored under the entry's key.
    async fn put(&self, entry: &CacheEntry) -> Result<(), StoreError>;

    /// Returns the name of this store backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shareable store instance.
pub type DynSnapshotStore = Arc<dyn SnapshotStore>;

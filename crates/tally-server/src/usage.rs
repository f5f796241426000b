//! Read-through orchestration across the cache tiers and the backends.
//!
//! Lookup order per invocation:
//!
//! ```text
//! GET → local cache → persistent store → recompute (backends + aggregate)
//!                                          ↓
//!                               write store, write local cache
//! ```
//!
//! Concurrent invocations across instances may both miss and both recompute;
//! the store write is a blind overwrite and the last writer wins. That
//! inefficiency is accepted in exchange for not coordinating recomputes.

use time::{Duration, OffsetDateTime};

use crate::error::UsageError;
use tally_backends::BackendClient;
use tally_cache::{CacheEntry, DynSnapshotStore, LocalSnapshotCache};
use tally_core::{UsageSnapshot, aggregate};

/// Trailing window for monthly-active-user counting; doubles as the
/// event-fetch filter boundary.
const MONTHLY_WINDOW: Duration = Duration::days(30);

/// The read-through usage-snapshot service.
///
/// Owns the decision of which cache layer is authoritative at any instant;
/// the layers themselves never reach into each other.
pub struct UsageService {
    local: LocalSnapshotCache,
    store: DynSnapshotStore,
    client: BackendClient,
    cache_key: String,
    ttl: Duration,
}

impl UsageService {
    /// Creates a service with an empty process-local cache.
    pub fn new(
        store: DynSnapshotStore,
        client: BackendClient,
        cache_key: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            local: LocalSnapshotCache::new(),
            store,
            client,
            cache_key: cache_key.into(),
            ttl,
        }
    }

    /// Serves the usage snapshot for `now`.
    ///
    /// A store read failure downgrades to a miss and a store write failure is
    /// logged while the computed snapshot is served anyway. A backend fetch
    /// failure is fatal for this invocation and nothing is cached, since
    /// aggregating partial data would silently under-count.
    pub async fn invoke(&self, now: OffsetDateTime) -> Result<UsageSnapshot, UsageError> {
        if let Some(snapshot) = self.local.get(now) {
            crate::metrics::record_cache_hit("memory");
            log_invocation(true, false, 0, 0, 0.0);
            return Ok(snapshot);
        }

        match self.store.get(&self.cache_key).await {
            Ok(Some(entry)) if entry.is_fresh(now) => {
                self.local.set(entry.data.clone());
                crate::metrics::record_cache_hit("store");
                log_invocation(false, true, 0, 0, 0.0);
                return Ok(entry.data);
            }
            Ok(Some(_)) => {
                tracing::debug!(key = %self.cache_key, "persistent cache entry expired");
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(
                    key = %self.cache_key,
                    error = %err,
                    "persistent cache read failed, treating as miss"
                );
            }
        }
        crate::metrics::record_cache_miss();

        let window_start = now - MONTHLY_WINDOW;
        let (users, events) = match tokio::join!(
            self.client.fetch_all_users(),
            self.client.fetch_recent_events(window_start),
        ) {
            (Ok(users), Ok(events)) => (users, events),
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(error = %err, "backend fetch failed, aborting recompute");
                log_invocation(false, false, 0, 0, 0.0);
                return Err(UsageError::BackendUnavailable(err));
            }
        };

        let stats = aggregate(&users.users, &events.events, now);
        let snapshot = UsageSnapshot::new(stats, now + self.ttl)?;

        let entry = CacheEntry::new(self.cache_key.clone(), snapshot.clone());
        if let Err(err) = self.store.put(&entry).await {
            tracing::warn!(
                key = %self.cache_key,
                error = %err,
                "persistent cache write failed, serving computed snapshot anyway"
            );
        }
        self.local.set(snapshot.clone());

        crate::metrics::record_recompute(users.pages, events.pages, events.capacity_units);
        log_invocation(false, false, users.pages, events.pages, events.capacity_units);
        Ok(snapshot)
    }
}

// One structured record per invocation, on every path. Page and capacity
// fields are zero whenever a cache hit short-circuited backend access.
fn log_invocation(
    memory_cache_hit: bool,
    db_cache_hit: bool,
    user_pages: u32,
    event_pages: u32,
    consumed_capacity_units: f64,
) {
    tracing::info!(
        target: "tally::usage",
        memory_cache_hit,
        db_cache_hit,
        user_pages,
        event_pages,
        consumed_capacity_units,
        "usage invocation"
    );
}

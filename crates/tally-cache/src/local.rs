//! Process-local snapshot cache.

use parking_lot::Mutex;
use time::OffsetDateTime;

use tally_core::UsageSnapshot;

/// Single-slot in-memory cache of the current snapshot.
///
/// Constructed empty once per process and injected into the orchestrator;
/// there is no global instance. A cold start therefore always misses here
/// and falls through to the persistent store. Expiry is checked on every
/// read rather than by a background eviction timer, and the slot is safe
/// under concurrent in-flight invocations.
#[derive(Default)]
pub struct LocalSnapshotCache {
    slot: Mutex<Option<UsageSnapshot>>,
}

impl LocalSnapshotCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot if one is present and still fresh at
    /// `now`. An expired snapshot is dropped on the way out.
    pub fn get(&self, now: OffsetDateTime) -> Option<UsageSnapshot> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(snapshot) if snapshot.is_fresh(now) => Some(snapshot.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    /// Unconditionally replaces the cached snapshot.
    pub fn set(&self, snapshot: UsageSnapshot) {
        *self.slot.lock() = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::UsageStats;
    use time::Duration;
    use time::macros::datetime;

    fn snapshot(expires_at: OffsetDateTime) -> UsageSnapshot {
        UsageSnapshot::new(
            UsageStats {
                confirmed_users: 4,
                monthly_active_users: 3,
                weekly_active_users: 2,
            },
            expires_at,
        )
        .unwrap()
    }

    #[test]
    fn test_cold_start_misses() {
        let cache = LocalSnapshotCache::new();
        assert!(cache.get(datetime!(2024-05-01 00:00:00 UTC)).is_none());
    }

    #[test]
    fn test_fresh_snapshot_is_returned() {
        let now = datetime!(2024-05-01 00:00:00 UTC);
        let cache = LocalSnapshotCache::new();
        let snap = snapshot(now + Duration::hours(24));
        cache.set(snap.clone());
        assert_eq!(cache.get(now), Some(snap));
    }

    #[test]
    fn test_expired_snapshot_is_dropped_on_read() {
        let now = datetime!(2024-05-01 00:00:00 UTC);
        let cache = LocalSnapshotCache::new();
        cache.set(snapshot(now - Duration::seconds(1)));
        assert!(cache.get(now).is_none());
        // Still empty afterwards; the stale value was evicted.
        assert!(cache.get(now - Duration::hours(1)).is_none());
    }

    #[test]
    fn test_set_overwrites_unconditionally() {
        let now = datetime!(2024-05-01 00:00:00 UTC);
        let cache = LocalSnapshotCache::new();
        let older = snapshot(now + Duration::hours(1));
        let newer = snapshot(now + Duration::hours(24));
        cache.set(older);
        cache.set(newer.clone());
        assert_eq!(cache.get(now), Some(newer));
    }
}

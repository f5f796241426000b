//! Pure aggregation over fetched users and events.

use crate::model::{EventRecord, UsageStats, UserId, UserRecord};
use std::collections::HashSet;
use time::{Duration, OffsetDateTime};

/// Trailing window for weekly-active-user counting.
const WEEKLY_WINDOW: Duration = Duration::days(7);

/// Compute usage metrics from the full fetched data set.
///
/// Pure function: no I/O, no side effects. The caller guarantees that
/// `events` is already restricted to the monthly window (the filter is pushed
/// to the event-log query), so every supplied event counts toward MAU.
/// Distinct-user counting is set-based: multiple events from the same user
/// within a window count that user once.
pub fn aggregate(users: &[UserRecord], events: &[EventRecord], now: OffsetDateTime) -> UsageStats {
    let confirmed_users = users.iter().filter(|user| user.is_confirmed()).count() as u64;

    let week_start = now - WEEKLY_WINDOW;
    let mut monthly: HashSet<&UserId> = HashSet::new();
    let mut weekly: HashSet<&UserId> = HashSet::new();
    for event in events {
        monthly.insert(&event.user_id);
        if *event.created_at.inner() > week_start {
            weekly.insert(&event.user_id);
        }
    }

    UsageStats {
        confirmed_users,
        monthly_active_users: monthly.len() as u64,
        weekly_active_users: weekly.len() as u64,
    }
}

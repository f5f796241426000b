//! Pagination-draining client over the two backend collaborators.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::error::BackendError;
use crate::traits::{EventStore, UserDirectory};
use tally_core::{EventRecord, UserRecord};

/// Result of draining the user directory.
#[derive(Debug, Clone)]
pub struct UserFetch {
    pub users: Vec<UserRecord>,
    /// Number of pages fetched.
    pub pages: u32,
}

/// Result of draining the event log.
#[derive(Debug, Clone)]
pub struct EventFetch {
    pub events: Vec<EventRecord>,
    /// Number of pages fetched.
    pub pages: u32,
    /// Capacity units consumed, summed across pages. Observability only.
    pub capacity_units: f64,
}

/// Client that exhaustively drains both paginated backends.
///
/// Errors are not retried here; any page failure aborts the fetch and
/// surfaces the [`BackendError`] to the caller.
#[derive(Clone)]
pub struct BackendClient {
    directory: Arc<dyn UserDirectory>,
    events: Arc<dyn EventStore>,
}

impl BackendClient {
    pub fn new(directory: Arc<dyn UserDirectory>, events: Arc<dyn EventStore>) -> Self {
        Self { directory, events }
    }

    /// Fetches every user in the directory, following pagination until the
    /// backend signals no further pages.
    pub async fn fetch_all_users(&self) -> Result<UserFetch, BackendError> {
        let mut users = Vec::new();
        let mut pages = 0u32;
        let mut token: Option<String> = None;
        loop {
            let page = self.directory.list_users(token.as_deref()).await?;
            users.extend(page.users);
            pages += 1;
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        tracing::debug!(count = users.len(), pages, "user directory drained");
        Ok(UserFetch { users, pages })
    }

    /// Fetches every event created after `window_start`, following the scan
    /// continuation key until exhaustion and summing reported capacity units.
    pub async fn fetch_recent_events(
        &self,
        window_start: OffsetDateTime,
    ) -> Result<EventFetch, BackendError> {
        let mut events = Vec::new();
        let mut pages = 0u32;
        let mut capacity_units = 0.0f64;
        let mut continuation: Option<String> = None;
        loop {
            let page = self
                .events
                .scan_events(window_start, continuation.as_deref())
                .await?;
            events.extend(page.events);
            pages += 1;
            capacity_units += page.consumed_capacity;
            match page.next_key {
                Some(next) => continuation = Some(next),
                None => break,
            }
        }
        tracing::debug!(
            count = events.len(),
            pages,
            capacity_units,
            "event log drained"
        );
        Ok(EventFetch {
            events,
            pages,
            capacity_units,
        })
    }
}

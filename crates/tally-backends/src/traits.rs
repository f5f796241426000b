//! Collaborator traits for the two external data sources.
//!
//! Both sources hand back one page per call plus an opaque continuation
//! token; [`crate::BackendClient`] drains them to exhaustion. Implementations
//! must be thread-safe (`Send + Sync`).

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::BackendError;
use tally_core::{EventRecord, UserRecord};

/// One page of directory users.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    /// Token for the next page; `None` means the listing is exhausted.
    pub next_token: Option<String>,
}

/// One page of event-log records.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<EventRecord>,
    /// Continuation key for the next page; `None` means the scan is done.
    pub next_key: Option<String>,
    /// Capacity units the backend charged for this page.
    pub consumed_capacity: f64,
}

/// The user directory collaborator.
///
/// # Errors
///
/// A failed page surfaces as [`BackendError`]; the caller aborts the whole
/// listing rather than aggregate on partial data.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches one page of users, starting from `page_token` when given.
    async fn list_users(&self, page_token: Option<&str>) -> Result<UserPage, BackendError>;
}

/// The event log collaborator.
///
/// The window filter is evaluated server-side: events older than
/// `window_start` are never shipped to the client, which bounds memory use
/// independent of total historical volume.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetches one page of events created after `window_start`.
    async fn scan_events(
        &self,
        window_start: OffsetDateTime,
        continuation: Option<&str>,
    ) -> Result<EventPage, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that UserDirectory is object-safe
    fn _assert_directory_object_safe(_: &dyn UserDirectory) {}

    // Compile-time test that EventStore is object-safe
    fn _assert_event_store_object_safe(_: &dyn EventStore) {}
}

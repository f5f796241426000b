//! HTTP implementations of the backend collaborators.
//!
//! Both speak a small JSON paging protocol: the response carries the page
//! items plus an opaque continuation token, and the client echoes the token
//! back as a query parameter until the backend stops returning one.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use time::OffsetDateTime;
use url::Url;

use crate::error::BackendError;
use crate::traits::{EventPage, EventStore, UserDirectory, UserPage};
use tally_core::{EventRecord, EventTimestamp, UserRecord};

const USER_DIRECTORY: &str = "user directory";
const EVENT_LOG: &str = "event log";

fn build_client(timeout: Duration) -> Result<reqwest::Client, BackendError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPageDto {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPageDto {
    #[serde(default)]
    events: Vec<EventRecord>,
    #[serde(default)]
    last_evaluated_key: Option<String>,
    #[serde(default)]
    consumed_capacity_units: f64,
}

/// User directory reached over HTTP.
pub struct HttpUserDirectory {
    client: reqwest::Client,
    endpoint: Url,
    page_size: u32,
}

impl HttpUserDirectory {
    /// Creates a directory client for the given listing endpoint.
    pub fn new(endpoint: &str, timeout: Duration, page_size: u32) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: Url::parse(endpoint)?,
            page_size,
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn list_users(&self, page_token: Option<&str>) -> Result<UserPage, BackendError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("limit", self.page_size.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::status(USER_DIRECTORY, status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let page: UserPageDto = serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::decode(USER_DIRECTORY, e.to_string()))?;
        Ok(UserPage {
            users: page.users,
            next_token: page.next_token,
        })
    }
}

/// Event log reached over HTTP.
///
/// The window filter travels as the `createdAfter` query parameter so only
/// in-window events are ever shipped back.
pub struct HttpEventStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpEventStore {
    /// Creates an event-log client for the given scan endpoint.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl EventStore for HttpEventStore {
    async fn scan_events(
        &self,
        window_start: OffsetDateTime,
        continuation: Option<&str>,
    ) -> Result<EventPage, BackendError> {
        let created_after = EventTimestamp::new(window_start).to_string();
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("createdAfter", created_after.as_str())]);
        if let Some(key) = continuation {
            request = request.query(&[("startKey", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::status(EVENT_LOG, status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let page: EventPageDto = serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::decode(EVENT_LOG, e.to_string()))?;
        Ok(EventPage {
            events: page.events,
            next_key: page.last_evaluated_key,
            consumed_capacity: page.consumed_capacity_units,
        })
    }
}

//! Domain model for the usage-statistics pipeline.
//!
//! User and event records are ephemeral: fetched fresh on every recompute,
//! handed to the aggregator, then discarded. Only the resulting
//! [`UsageSnapshot`] is ever persisted.

use crate::error::Result;
use crate::time::EventTimestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Opaque user identifier.
///
/// Treated as an uninterpreted token; the only operations the pipeline needs
/// are equality and hashing for distinct-user counting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Account status reported by the user directory.
///
/// Directories grow new statuses over time; anything unrecognized maps to
/// `Unknown` instead of failing the whole fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Confirmed,
    Unconfirmed,
    ForceChangePassword,
    ResetRequired,
    Archived,
    #[serde(other)]
    Unknown,
}

/// A directory user as seen by the aggregation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub enabled: bool,
    pub status: UserStatus,
}

impl UserRecord {
    /// Whether this user counts toward the confirmed-user metric.
    pub fn is_confirmed(&self) -> bool {
        self.enabled && self.status == UserStatus::Confirmed
    }
}

/// A single event from the event log, projected down to the fields the
/// aggregator needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub created_at: EventTimestamp,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: UserId,
}

/// Computed usage metrics.
///
/// Field names on the wire are fixed; the operator dashboard consumes them
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(rename = "confirmedUsers")]
    pub confirmed_users: u64,
    #[serde(rename = "MAUs")]
    pub monthly_active_users: u64,
    #[serde(rename = "WAUs")]
    pub weekly_active_users: u64,
}

/// The computed result of one recompute pass: the metrics, the serialized
/// response payload, and the instant the snapshot stops being fresh.
///
/// Snapshots are immutable once produced and replaced wholesale on the next
/// recompute, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub stats: UsageStats,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl UsageSnapshot {
    /// Build a snapshot from freshly aggregated stats.
    pub fn new(stats: UsageStats, expires_at: OffsetDateTime) -> Result<Self> {
        let body = serde_json::to_string(&stats)?;
        Ok(Self {
            stats,
            body,
            expires_at,
        })
    }

    /// Whether the snapshot may still be served at `now`.
    pub fn is_fresh(&self, now: OffsetDateTime) -> bool {
        now <= self.expires_at
    }
}

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

/// An event-log timestamp.
///
/// Event records arrive as ISO-8601 strings, optionally carrying a trailing
/// zero-UTC-offset marker (`Z` or `+00:00`). The marker is stripped and the
/// remainder is parsed as a naive instant assumed to be UTC. Comparisons are
/// always done on the full instant, never on calendar dates, so window
/// boundaries behave correctly regardless of time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTimestamp(pub OffsetDateTime);

impl EventTimestamp {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}

impl fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(&Rfc3339).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for EventTimestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        parse_timestamp(s).map(EventTimestamp)
    }
}

impl Serialize for EventTimestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for EventTimestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EventTimestamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse an ISO-8601 timestamp, tolerating a trailing zero-UTC-offset marker.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime> {
    let naive = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .or_else(|| value.strip_suffix("+00:00"))
        .unwrap_or(value);
    let parsed = PrimitiveDateTime::parse(naive, &Iso8601::DEFAULT)
        .map_err(|e| CoreError::invalid_timestamp(format!("{value}: {e}")))?;
    Ok(parsed.assume_utc())
}

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_with_zulu_marker() {
        let parsed = parse_timestamp("2024-05-01T12:30:00Z").unwrap();
        assert_eq!(parsed, datetime!(2024-05-01 12:30:00 UTC));
    }

    #[test]
    fn test_parse_with_lowercase_marker() {
        let parsed = parse_timestamp("2024-05-01T12:30:00z").unwrap();
        assert_eq!(parsed, datetime!(2024-05-01 12:30:00 UTC));
    }

    #[test]
    fn test_parse_with_numeric_zero_offset() {
        let parsed = parse_timestamp("2024-05-01T12:30:00+00:00").unwrap();
        assert_eq!(parsed, datetime!(2024-05-01 12:30:00 UTC));
    }

    #[test]
    fn test_parse_naive() {
        let parsed = parse_timestamp("2024-05-01T12:30:00").unwrap();
        assert_eq!(parsed, datetime!(2024-05-01 12:30:00 UTC));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let parsed = parse_timestamp("2024-05-01T12:30:00.250Z").unwrap();
        assert_eq!(parsed, datetime!(2024-05-01 12:30:00.25 UTC));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_comparisons_are_full_instants() {
        // Same calendar date, different times of day. A date-based comparison
        // would collapse these.
        let earlier = parse_timestamp("2024-05-01T01:00:00Z").unwrap();
        let later = parse_timestamp("2024-05-01T23:00:00Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts: EventTimestamp = "2024-05-01T12:30:00Z".parse().unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_serde_round_trip() {
        let ts: EventTimestamp = serde_json::from_str("\"2024-05-01T12:30:00Z\"").unwrap();
        assert_eq!(ts, EventTimestamp(datetime!(2024-05-01 12:30:00 UTC)));
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-05-01T12:30:00Z\"");
    }
}

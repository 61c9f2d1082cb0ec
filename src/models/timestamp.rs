//! Serde helpers for optional timestamps.
//!
//! The backend emits naive ISO-8601 strings (`2024-05-01T10:00:00.123456`),
//! while other deployments send RFC 3339 with an offset. Both are accepted
//! and normalized to UTC.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse either an RFC 3339 or a naive ISO-8601 timestamp.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT))
        .ok()
}

pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.format(NAIVE_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn test_parse_naive_and_rfc3339() {
        let naive = parse("2024-05-01T10:00:00.123456").expect("naive timestamp");
        let offset = parse("2024-05-01T12:00:00.123456+02:00").expect("rfc3339 timestamp");
        assert_eq!(naive, offset);
        assert!(parse("2024-05-01T10:00:00Z").is_some());
        assert!(parse("yesterday").is_none());
    }
}

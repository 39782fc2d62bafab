//! Custom types for common data structures and validation

use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use utoipa::ToSchema;

/// Database DateTime type used for TIMESTAMPTZ columns
pub type DBDateTime = ChronoDateTime<Utc>;

/// Standard UTC DateTime type used across all Papa Popup crates
///
/// API responses serialize it as ISO 8601 with a 'Z' suffix, e.g.
/// `2025-10-12T12:15:47.609192Z`.
///
/// # OpenAPI Schema
/// When using with utoipa, add the schema attribute:
/// ```rust,ignore
/// #[schema(value_type = String, format = DateTime)]
/// pub field: UtcDateTime,
/// ```
pub type UtcDateTime = ChronoDateTime<Utc>;

/// Wrapper type for DateTime<Utc> that leniently parses ISO 8601 input
/// Accepts:
/// - `2024-01-15T14:30:00Z` / `2024-01-15T14:30:00+02:00` (RFC 3339)
/// - `2024-01-15T14:30:00` (naive datetime, assumes UTC)
/// - `2024-01-15` (calendar date, midnight UTC)
///
/// All formats are converted to DateTime<Utc>. Serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
#[schema(value_type = String, example = "2024-01-15T14:30:00Z")]
pub struct DateTime(pub ChronoDateTime<Utc>);

/// Error returned when a string is not an accepted ISO 8601 form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError(pub String);

impl fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid datetime '{}'. Use ISO 8601: YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ",
            self.0
        )
    }
}

impl std::error::Error for DateTimeParseError {}

impl FromStr for DateTime {
    type Err = DateTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = s.parse::<ChronoDateTime<Utc>>() {
            return Ok(DateTime(dt));
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive_dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(DateTime(naive_dt.and_utc()));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(DateTime(midnight.and_utc()));
            }
        }

        Err(DateTimeParseError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

// Allow using DateTime like DateTime<Utc>
impl Deref for DateTime {
    type Target = ChronoDateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ChronoDateTime<Utc>> for DateTime {
    fn from(dt: ChronoDateTime<Utc>) -> Self {
        DateTime(dt)
    }
}

impl From<DateTime> for ChronoDateTime<Utc> {
    fn from(dt: DateTime) -> Self {
        dt.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_datetime_deserialize_naive() {
        let dt: DateTime = serde_json::from_str(r#""2024-01-15T14:30:00""#).unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_datetime_parse_date_only_is_midnight_utc() {
        let dt: DateTime = "2024-03-09".parse().unwrap();
        assert_eq!(dt.day(), 9);
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.second(), 0);
    }

    #[test]
    fn test_datetime_timezone_conversion() {
        // 16:30 at +02:00 is 14:30 UTC
        let dt: DateTime = "2024-01-15T16:30:00+02:00".parse().unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_datetime_invalid() {
        let result: Result<DateTime, _> = serde_json::from_str(r#""invalid-date""#);
        assert!(result.is_err());

        let err = "2024-13-45".parse::<DateTime>().unwrap_err();
        assert!(err.to_string().contains("2024-13-45"));
    }

    #[test]
    fn test_datetime_serialize() {
        let dt: DateTime = "2024-01-15T14:30:00Z".parse().unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, r#""2024-01-15T14:30:00+00:00""#);
    }

    #[test]
    fn test_datetime_in_struct() {
        #[derive(Deserialize, Serialize)]
        struct Query {
            start_time: Option<DateTime>,
            end_time: Option<DateTime>,
        }

        let json = r#"{"start_time":"2024-01-15","end_time":"2024-01-15T18:30:00Z"}"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert!(query.start_time.is_some());
        assert!(query.end_time.is_some());
        assert!(query.start_time < query.end_time);
    }
}

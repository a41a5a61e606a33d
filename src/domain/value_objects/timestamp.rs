//! # Timestamp Value Object
//!
//! DateTime wrapper used to normalize review times.
//!
//! Every platform reports review times differently: Google sends Unix
//! seconds, Yelp a `YYYY-MM-DD HH:MM:SS` string, TripAdvisor an ISO-8601
//! string. [`Timestamp`] parses all of them and exposes Unix milliseconds,
//! the single unit used by [`Review::time`](crate::domain::entities::Review).
//!
//! # Examples
//!
//! ```
//! use review_import::domain::value_objects::timestamp::Timestamp;
//!
//! let ts = Timestamp::parse_platform("2023-06-01T12:00:00Z").unwrap();
//! assert_eq!(ts.timestamp_millis(), 1_685_620_800_000);
//!
//! let yelp = Timestamp::parse_platform("2023-06-01 12:00:00").unwrap();
//! assert_eq!(yelp, ts);
//! ```

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Naive formats accepted after RFC 3339 fails. Interpreted as UTC.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// A UTC timestamp.
///
/// # Invariants
///
/// - Always in UTC timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_import::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_millis(1704067200000).unwrap();
    /// assert_eq!(ts.timestamp_millis(), 1704067200000);
    /// ```
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Parses a platform-supplied date string.
    ///
    /// Accepts RFC 3339 (with any offset) and the naive
    /// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS[.fff]` forms, which
    /// are read as UTC.
    #[must_use]
    pub fn parse_platform(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        // TripAdvisor sometimes sends "+0000" offsets, which RFC 3339 rejects.
        if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the underlying `DateTime<Utc>`.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

//! Timestamp type and clock abstraction.
//!
//! Timestamps are Unix epoch seconds (UTC). Statements carry them as RFC 3339
//! strings; everything else works with the integer form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        Self(Utc::now().timestamp().max(0) as u64)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs`, saturating at `u64::MAX`.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp + duration has passed relative to `now`.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        now.0 >= self.0.saturating_add(duration_secs)
    }

    /// Render as RFC 3339 with second precision and a `Z` suffix,
    /// e.g. `2024-05-01T12:00:00Z`.
    pub fn to_rfc3339(&self) -> Result<String, TypesError> {
        let secs = i64::try_from(self.0)
            .map_err(|_| TypesError::InvalidTimestamp(self.0.to_string()))?;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .ok_or_else(|| TypesError::InvalidTimestamp(self.0.to_string()))
    }

    /// Parse an RFC 3339 string. Any offset is accepted and normalised to UTC;
    /// sub-second precision is truncated.
    pub fn parse_rfc3339(s: &str) -> Result<Self, TypesError> {
        let dt = DateTime::parse_from_rfc3339(s.trim())
            .map_err(|e| TypesError::InvalidTimestamp(format!("{s}: {e}")))?;
        let secs = dt.timestamp();
        if secs < 0 {
            return Err(TypesError::InvalidTimestamp(format!("{s}: before Unix epoch")));
        }
        Ok(Self(secs as u64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time.
///
/// Components that need "now" (the statement builder, the signature cache)
/// take a clock so tests can drive time deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_renders_utc_seconds() {
        let ts = Timestamp::new(1_714_564_800);
        assert_eq!(ts.to_rfc3339().unwrap(), "2024-05-01T12:00:00Z");
    }

    #[test]
    fn rfc3339_parses_offsets_into_utc() {
        let ts = Timestamp::parse_rfc3339("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(ts.as_secs(), 1_714_564_800);
    }

    #[test]
    fn rfc3339_rejects_garbage_and_pre_epoch() {
        assert!(Timestamp::parse_rfc3339("yesterday").is_err());
        assert!(Timestamp::parse_rfc3339("1969-12-31T23:59:59Z").is_err());
    }

    #[test]
    fn rfc3339_rejects_out_of_range() {
        assert!(Timestamp::new(u64::MAX).to_rfc3339().is_err());
    }

    #[test]
    fn plus_secs_saturates() {
        assert_eq!(Timestamp::new(u64::MAX - 1).plus_secs(10).as_secs(), u64::MAX);
    }

    #[test]
    fn has_expired_boundary() {
        let t = Timestamp::new(100);
        assert!(!t.has_expired(300, Timestamp::new(399)));
        assert!(t.has_expired(300, Timestamp::new(400)));
    }
}

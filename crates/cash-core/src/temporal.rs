//! # Temporal Types
//!
//! UTC-only timestamp type and the clock abstraction used by the claim
//! rate limiter. Timestamps carry whole seconds; sub-second precision is
//! truncated at construction so cooldown comparisons are exact.
//!
//! ## Clocks
//!
//! - [`SystemClock`] reads the host's UTC wall clock.
//! - [`ManualClock`] is set explicitly. Clones share the same instant, so a
//!   test can keep one handle and advance time under a gate that owns the
//!   other.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC timestamp with second-level precision.
///
/// Serializes to RFC 3339 (e.g., `1970-01-12T13:46:40Z`). Deserializing
/// drops any fractional seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "DateTime<Utc>")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(DateTime::<Utc>::UNIX_EPOCH);

    /// The latest whole second chrono can represent.
    pub fn max_value() -> Self {
        Self::truncate(DateTime::<Utc>::MAX_UTC)
    }

    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::truncate(Utc::now())
    }

    /// Create a timestamp from seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if `secs` is outside
    /// chrono's representable range.
    pub fn from_unix(secs: i64) -> Result<Self, ValidationError> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                value: secs.to_string(),
                reason: "outside the representable range".to_string(),
            })
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, dropping sub-seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::truncate(dt)
    }

    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Whole seconds elapsed from `earlier` to `self`.
    ///
    /// Negative when `earlier` is in the future relative to `self`.
    pub fn seconds_since(&self, earlier: &Timestamp) -> i64 {
        self.unix_seconds() - earlier.unix_seconds()
    }

    /// This timestamp moved forward by `secs`, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        let secs = i64::try_from(secs).ok()?;
        let delta = Duration::try_seconds(secs)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    /// ISO 8601 with `Z` suffix, truncated to seconds.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    fn truncate(dt: DateTime<Utc>) -> Self {
        match DateTime::<Utc>::from_timestamp(dt.timestamp(), 0) {
            Some(whole) => Self(whole),
            None => Self(dt),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::truncate(dt)
    }
}

/// Source of the current time for rate-limit decisions.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Host wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// An explicitly controlled clock. Clones observe the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(RwLock::new(start)),
        }
    }

    /// Jump to `at`. Moving backwards is permitted.
    pub fn set(&self, at: Timestamp) {
        *self.current.write() = at;
    }

    /// Move forward by `secs`. Saturates at [`Timestamp::max_value`].
    pub fn advance(&self, secs: u64) {
        let mut current = self.current.write();
        *current = current
            .checked_add_secs(secs)
            .unwrap_or_else(Timestamp::max_value);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_unix_round_trips() {
        let ts = Timestamp::from_unix(1_000_000).unwrap();
        assert_eq!(ts.unix_seconds(), 1_000_000);
        assert_eq!(ts.to_canonical_string(), "1970-01-12T13:46:40Z");
    }

    #[test]
    fn from_unix_rejects_out_of_range() {
        let err = Timestamp::from_unix(i64::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn subseconds_are_truncated() {
        let dt = DateTime::<Utc>::from_timestamp(42, 999_000_000).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts, Timestamp::from_unix(42).unwrap());
    }

    #[test]
    fn seconds_since_is_signed() {
        let a = Timestamp::from_unix(100).unwrap();
        let b = Timestamp::from_unix(160).unwrap();
        assert_eq!(b.seconds_since(&a), 60);
        assert_eq!(a.seconds_since(&b), -60);
    }

    #[test]
    fn checked_add_secs() {
        let a = Timestamp::from_unix(1_000_000).unwrap();
        assert_eq!(a.checked_add_secs(86_400).unwrap().unix_seconds(), 1_086_400);
        assert!(a.checked_add_secs(u64::MAX).is_none());
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(Timestamp::from_unix(10).unwrap());
        let handle = clock.clone();
        handle.advance(5);
        assert_eq!(clock.now().unix_seconds(), 15);
        handle.set(Timestamp::from_unix(3).unwrap());
        assert_eq!(clock.now().unix_seconds(), 3);
    }

    #[test]
    fn manual_clock_advance_saturates() {
        let clock = ManualClock::new(Timestamp::from_unix(10).unwrap());
        clock.advance(u64::MAX);
        assert_eq!(clock.now(), Timestamp::max_value());
        assert!(clock.now() > Timestamp::from_unix(10).unwrap());
        clock.advance(1);
        assert_eq!(clock.now(), Timestamp::max_value());
    }

    #[test]
    fn max_value_is_whole_seconds() {
        let max = Timestamp::max_value();
        assert_eq!(max.as_datetime().timestamp_subsec_nanos(), 0);
        assert!(max.checked_add_secs(1).is_none());
    }

    #[test]
    fn deserialize_truncates_subseconds() {
        let ts: Timestamp = serde_json::from_str("\"1970-01-12T13:46:40.9Z\"").unwrap();
        assert_eq!(ts, Timestamp::from_unix(1_000_000).unwrap());
        assert_eq!(ts.as_datetime().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now() > Timestamp::EPOCH);
    }

    #[test]
    fn serde_round_trip() {
        let ts = Timestamp::from_unix(1_086_400).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}

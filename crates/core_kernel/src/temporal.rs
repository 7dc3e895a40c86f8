//! Time handling over a caller-supplied clock
//!
//! The ledger never reads the wall clock itself. Every operation receives
//! `now` from its caller, so replaying the same operation log always yields
//! the same state. The helpers here compute elapsed and remaining windows
//! without ever producing a negative duration.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// A point in time as supplied by the execution environment
pub type Timestamp = DateTime<Utc>;

/// Errors related to temporal values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Duration must be positive: {name} is {seconds}s")]
    NonPositiveDuration {
        name: String,
        seconds: i64,
    },
}

impl TemporalError {
    /// Validates that a configured duration is strictly positive
    pub fn ensure_positive(name: &str, duration: Duration) -> Result<(), TemporalError> {
        if duration <= Duration::zero() {
            return Err(TemporalError::NonPositiveDuration {
                name: name.to_string(),
                seconds: duration.num_seconds(),
            });
        }
        Ok(())
    }
}

/// Time elapsed from `earlier` to `later`, clamped at zero
///
/// A `later` that precedes `earlier` (an out-of-order clock input) counts as
/// no time having passed.
pub fn elapsed_between(earlier: Timestamp, later: Timestamp) -> Duration {
    let elapsed = later - earlier;
    if elapsed < Duration::zero() {
        Duration::zero()
    } else {
        elapsed
    }
}

/// Time left from `now` until `started + window`, clamped at zero
pub fn remaining_until(started: Timestamp, window: Duration, now: Timestamp) -> Duration {
    let remaining = window - elapsed_between(started, now);
    if remaining < Duration::zero() {
        Duration::zero()
    } else {
        remaining
    }
}

/// Serde adapter storing a `chrono::Duration` as whole seconds
pub mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        Duration::try_seconds(seconds)
            .ok_or_else(|| serde::de::Error::custom(format!("duration out of range: {}s", seconds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_elapsed_between_is_never_negative() {
        assert_eq!(elapsed_between(at(10), at(5)), Duration::zero());
        assert_eq!(elapsed_between(at(5), at(10)), Duration::seconds(5));
    }

    #[test]
    fn test_remaining_until() {
        let window = Duration::seconds(60);
        assert_eq!(remaining_until(at(0), window, at(20)), Duration::seconds(40));
        assert_eq!(remaining_until(at(0), window, at(60)), Duration::zero());
        assert_eq!(remaining_until(at(0), window, at(600)), Duration::zero());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(TemporalError::ensure_positive("grace_period", Duration::days(30)).is_ok());
        assert!(matches!(
            TemporalError::ensure_positive("grace_period", Duration::zero()),
            Err(TemporalError::NonPositiveDuration { .. })
        ));
    }

    #[test]
    fn test_duration_secs_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Window {
            #[serde(with = "duration_secs")]
            grace: Duration,
        }

        let json = serde_json::to_string(&Window { grace: Duration::days(1) }).unwrap();
        assert_eq!(json, r#"{"grace":86400}"#);
        let back: Window = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grace, Duration::days(1));
    }
}

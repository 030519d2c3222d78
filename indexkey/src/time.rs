//! Time source abstraction.
//!
//! Zone offsets are always resolved "at now". This module provides a
//! `TimeSource` trait so production code reads the system clock while tests
//! pin "now" to a fixed instant.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// Abstraction over the wall clock.
pub trait TimeSource {
    /// Get the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Real time source using the system clock.
///
/// This is the default implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    #[allow(clippy::cast_possible_truncation)] // u64 milliseconds last billions of years
    fn now_ms(&self) -> u64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_millis() as u64)
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedTimeSource(pub u64);

impl TimeSource for FixedTimeSource {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Current instant of `source` as a UTC date-time.
#[must_use]
pub fn now_utc(source: &dyn TimeSource) -> DateTime<Utc> {
    i64::try_from(source.now_ms())
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

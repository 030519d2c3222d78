//! Durations applied to time-of-day values.

use super::error::TemporalError;
use super::value::{NANOS_PER_SECOND, SECONDS_PER_DAY};

#[allow(clippy::cast_possible_wrap)] // NANOS_PER_SECOND fits in i64
const NANOS_PER_SECOND_I64: i64 = NANOS_PER_SECOND as i64;

/// A duration split into calendar and clock parts.
///
/// Only the clock part below one day moves a time-of-day; months, days and
/// whole days of seconds are carried for completeness but have no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Duration {
    months: i64,
    days: i64,
    seconds: i64,
    nanos: i64,
}

impl Duration {
    /// Create a duration, normalizing `nanos` into `0..1_000_000_000`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if carrying whole seconds out of `nanos`
    /// overflows `seconds`.
    pub const fn new(
        months: i64,
        days: i64,
        seconds: i64,
        nanos: i64,
    ) -> Result<Self, TemporalError> {
        let Some(seconds) = seconds.checked_add(nanos.div_euclid(NANOS_PER_SECOND_I64)) else {
            return Err(TemporalError::InvalidField {
                field: "duration seconds",
                value: seconds,
            });
        };
        Ok(Self {
            months,
            days,
            seconds,
            nanos: nanos.rem_euclid(NANOS_PER_SECOND_I64),
        })
    }

    #[must_use]
    pub const fn of_seconds(seconds: i64) -> Self {
        Self {
            months: 0,
            days: 0,
            seconds,
            nanos: 0,
        }
    }

    #[must_use]
    pub const fn of_nanos(nanos: i64) -> Self {
        Self {
            months: 0,
            days: 0,
            seconds: nanos.div_euclid(NANOS_PER_SECOND_I64),
            nanos: nanos.rem_euclid(NANOS_PER_SECOND_I64),
        }
    }

    #[must_use]
    pub const fn months(&self) -> i64 {
        self.months
    }

    #[must_use]
    pub const fn days(&self) -> i64 {
        self.days
    }

    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    #[must_use]
    pub const fn nanos(&self) -> i64 {
        self.nanos
    }

    /// The part of this duration that moves a time-of-day, in nanoseconds.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // SECONDS_PER_DAY fits in i64
    pub const fn nanos_of_day(&self) -> i64 {
        (self.seconds % SECONDS_PER_DAY as i64) * NANOS_PER_SECOND_I64 + self.nanos
    }
}

//! Time-of-day with a fixed UTC offset.
//!
//! # Comparison Semantics
//!
//! Values compare, hash and test equal by their instant-of-day: the local
//! time minus the offset, wrapped into one 24h UTC day. `14:30+01:00` and
//! `13:30Z` are therefore the same value, even though they print
//! differently. This permissive equality is deliberate and is what the
//! index keys rely on; the offset rides along only to reconstruct the
//! original local representation.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::duration::Duration;
use super::error::TemporalError;
use super::fields::{self, TimeFields};
use super::offset::ZoneOffset;
use super::parse;
use super::source::Temporal;
use super::unit::TimeUnit;
use super::zone::{Zone, ZoneResolver};
use crate::time::{MILLIS_PER_DAY, TimeSource};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const NANOS_PER_DAY: u64 = SECONDS_PER_DAY * NANOS_PER_SECOND;

/// An immutable time-of-day at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct TimeValue {
    /// Local wall-clock nanoseconds since midnight, `0..NANOS_PER_DAY`.
    local_nanos: u64,
    offset: ZoneOffset,
}

impl TimeValue {
    /// Create a time from explicit fields.
    pub fn of(
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
        offset: ZoneOffset,
    ) -> Result<Self, TemporalError> {
        check_field("hour", i64::from(hour), 23)?;
        check_field("minute", i64::from(minute), 59)?;
        check_field("second", i64::from(second), 59)?;
        check_field("nanosecond", i64::from(nanosecond), 999_999_999)?;

        let seconds = u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second);
        Ok(Self {
            local_nanos: seconds * NANOS_PER_SECOND + u64::from(nanosecond),
            offset,
        })
    }

    /// Create a time from explicit fields and offset text (`Z`, `+01:00`, `-0530`...).
    pub fn of_offset_text(
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
        offset: &str,
    ) -> Result<Self, TemporalError> {
        Self::of(hour, minute, second, nanosecond, ZoneOffset::parse(offset)?)
    }

    /// Create a time from a local nanosecond-of-day.
    pub fn from_local_nanos(local_nanos: u64, offset: ZoneOffset) -> Result<Self, TemporalError> {
        if local_nanos >= NANOS_PER_DAY {
            return Err(TemporalError::InvalidField {
                field: "nanosecond of day",
                value: i64::try_from(local_nanos).unwrap_or(i64::MAX),
            });
        }
        Ok(Self {
            local_nanos,
            offset,
        })
    }

    /// Create the time at UTC nanosecond-of-day `nanos_utc`, seen through `zone`.
    ///
    /// `nanos_utc` may be any count of nanoseconds since a UTC midnight (for
    /// example nanoseconds since the epoch); whole days are discarded. The
    /// zone's offset is resolved at the current instant of `clock`.
    pub fn from_nanos_of_day_utc(
        nanos_utc: i64,
        zone: &Zone,
        clock: &dyn TimeSource,
    ) -> Result<Self, TemporalError> {
        let offset = zone.current_offset(clock)?;
        Ok(Self::from_utc_nanos_wrapping(nanos_utc, offset))
    }

    /// The current time of `clock`, seen through `zone`.
    pub fn now(clock: &dyn TimeSource, zone: &Zone) -> Result<Self, TemporalError> {
        let nanos_utc = (clock.now_ms() % MILLIS_PER_DAY) * 1_000_000;
        Self::from_nanos_of_day_utc(nanos_utc as i64, zone, clock)
    }

    /// Parse `[T]HH[:MM[:SS[.fraction]]][offset]`.
    ///
    /// Without an offset in the text, the default zone of `resolver` is
    /// resolved immediately at the current instant of `clock`.
    pub fn parse(
        text: &str,
        resolver: &dyn ZoneResolver,
        clock: &dyn TimeSource,
    ) -> Result<Self, TemporalError> {
        parse::parse_time(text, resolver, clock)
    }

    /// Rebuild a value from its key parts: UTC nanosecond-of-day and offset seconds.
    pub fn from_key_parts(utc_nanos: u64, offset_seconds: i32) -> Result<Self, TemporalError> {
        if utc_nanos >= NANOS_PER_DAY {
            return Err(TemporalError::InvalidField {
                field: "instant nanosecond of day",
                value: i64::try_from(utc_nanos).unwrap_or(i64::MAX),
            });
        }
        let offset = ZoneOffset::from_seconds(offset_seconds)?;
        Ok(Self::from_utc_nanos_wrapping(utc_nanos as i64, offset))
    }

    /// The key parts of this value: `(utc_nanos_of_day, offset_seconds)`.
    #[must_use]
    pub fn to_key_parts(&self) -> (u64, i32) {
        (self.utc_nanos_of_day(), self.offset.total_seconds())
    }

    fn from_utc_nanos_wrapping(nanos_utc: i64, offset: ZoneOffset) -> Self {
        let shifted = i128::from(nanos_utc)
            + i128::from(offset.total_seconds()) * i128::from(NANOS_PER_SECOND);
        Self {
            local_nanos: shifted.rem_euclid(i128::from(NANOS_PER_DAY)) as u64,
            offset,
        }
    }

    #[must_use]
    pub const fn hour(&self) -> u32 {
        (self.local_nanos / (3600 * NANOS_PER_SECOND)) as u32
    }

    #[must_use]
    pub const fn minute(&self) -> u32 {
        ((self.local_nanos / (60 * NANOS_PER_SECOND)) % 60) as u32
    }

    #[must_use]
    pub const fn second(&self) -> u32 {
        ((self.local_nanos / NANOS_PER_SECOND) % 60) as u32
    }

    #[must_use]
    pub const fn nanosecond(&self) -> u32 {
        (self.local_nanos % NANOS_PER_SECOND) as u32
    }

    #[must_use]
    pub const fn offset(&self) -> ZoneOffset {
        self.offset
    }

    #[must_use]
    pub const fn local_nanos_of_day(&self) -> u64 {
        self.local_nanos
    }

    /// Instant-of-day: nanoseconds since the start of the UTC day.
    #[must_use]
    pub fn utc_nanos_of_day(&self) -> u64 {
        let offset_nanos = i64::from(self.offset.total_seconds()) * NANOS_PER_SECOND as i64;
        (self.local_nanos as i64 - offset_nanos).rem_euclid(NANOS_PER_DAY as i64) as u64
    }

    /// Same wall-clock time at another offset (the instant moves).
    #[must_use]
    pub const fn with_offset_same_local(&self, offset: ZoneOffset) -> Self {
        Self {
            local_nanos: self.local_nanos,
            offset,
        }
    }

    /// Same instant seen at another offset (the wall-clock time moves).
    #[must_use]
    pub fn with_offset_same_instant(&self, offset: ZoneOffset) -> Self {
        Self::from_utc_nanos_wrapping(self.utc_nanos_of_day() as i64, offset)
    }

    /// Add the time-of-day part of `duration`, wrapping around midnight.
    #[must_use]
    pub const fn add(&self, duration: &Duration) -> Self {
        self.plus_nanos(duration.nanos_of_day())
    }

    /// Subtract the time-of-day part of `duration`, wrapping around midnight.
    #[must_use]
    pub const fn sub(&self, duration: &Duration) -> Self {
        self.plus_nanos(-duration.nanos_of_day())
    }

    const fn plus_nanos(&self, nanos: i64) -> Self {
        let local = (self.local_nanos as i64 + nanos.rem_euclid(NANOS_PER_DAY as i64))
            .rem_euclid(NANOS_PER_DAY as i64);
        Self {
            local_nanos: local as u64,
            offset: self.offset,
        }
    }

    /// Zero every field finer than `unit`, keeping the offset.
    #[must_use]
    pub const fn truncated_to(&self, unit: TimeUnit) -> Self {
        Self {
            local_nanos: unit.truncate(self.local_nanos),
            offset: self.offset,
        }
    }

    /// Truncate the time part of `input` to `unit`, then apply `overrides`.
    ///
    /// A `timezone` override is applied first and keeps the local wall-clock
    /// time rather than the instant. Remaining overrides go through the
    /// builder; an explicit sub-second override wins over the truncated zero.
    pub fn truncate(
        unit: TimeUnit,
        input: &Temporal,
        overrides: &TimeFields,
        resolver: &dyn ZoneResolver,
        clock: &dyn TimeSource,
    ) -> Result<Self, TemporalError> {
        let mut truncated = input.time_part(resolver, clock)?.truncated_to(unit);
        if overrides.is_empty() {
            return Ok(truncated);
        }

        if let Some(zone) = overrides.timezone {
            truncated = truncated.with_offset_same_local(zone.current_offset(clock)?);
        }

        let mut remaining = overrides.without_timezone();
        fields::reconcile_subseconds(&mut remaining, unit, &truncated);
        if remaining.is_empty() {
            return Ok(truncated);
        }

        super::builder::TimeBuilder::new()
            .select(Temporal::Time(truncated))
            .with_fields(remaining)
            .build(resolver, clock)
    }
}

pub(super) fn check_field(field: &'static str, value: i64, max: i64) -> Result<(), TemporalError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(TemporalError::InvalidField { field, value })
    }
}

impl PartialEq for TimeValue {
    fn eq(&self, other: &Self) -> bool {
        self.utc_nanos_of_day() == other.utc_nanos_of_day()
    }
}

impl Eq for TimeValue {}

impl Hash for TimeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.utc_nanos_of_day().hash(state);
    }
}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc_nanos_of_day().cmp(&other.utc_nanos_of_day())
    }
}

impl std::fmt::Display for TimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())?;
        let (second, nano) = (self.second(), self.nanosecond());
        if second != 0 || nano != 0 {
            write!(f, ":{second:02}")?;
            if nano % 1_000_000 == 0 && nano != 0 {
                write!(f, ".{:03}", nano / 1_000_000)?;
            } else if nano % 1_000 == 0 && nano != 0 {
                write!(f, ".{:06}", nano / 1_000)?;
            } else if nano != 0 {
                write!(f, ".{nano:09}")?;
            }
        }
        write!(f, "{}", self.offset)
    }
}

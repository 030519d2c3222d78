//! Temporal values a time can be selected from.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::TemporalError;
use super::offset::ZoneOffset;
use super::value::{NANOS_PER_SECOND, TimeValue};
use super::zone::ZoneResolver;
use crate::time::TimeSource;

/// What a temporal value carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_date: bool,
    pub has_time: bool,
    pub has_zone: bool,
}

impl Capabilities {
    pub const TIME: Self = Self {
        has_date: false,
        has_time: true,
        has_zone: true,
    };
    pub const LOCAL_TIME: Self = Self {
        has_date: false,
        has_time: true,
        has_zone: false,
    };
    pub const DATE_TIME: Self = Self {
        has_date: true,
        has_time: true,
        has_zone: true,
    };
    pub const LOCAL_DATE_TIME: Self = Self {
        has_date: true,
        has_time: true,
        has_zone: false,
    };
    pub const DATE: Self = Self {
        has_date: true,
        has_time: false,
        has_zone: false,
    };
}

/// Any temporal value the builder accepts as a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Time(TimeValue),
    LocalTime(NaiveTime),
    DateTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl Temporal {
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::Time(_) => Capabilities::TIME,
            Self::LocalTime(_) => Capabilities::LOCAL_TIME,
            Self::DateTime(_) => Capabilities::DATE_TIME,
            Self::LocalDateTime(_) => Capabilities::LOCAL_DATE_TIME,
            Self::Date(_) => Capabilities::DATE,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Time(_) => "time",
            Self::LocalTime(_) => "local time",
            Self::DateTime(_) => "date-time",
            Self::LocalDateTime(_) => "local date-time",
            Self::Date(_) => "date",
        }
    }

    /// The time-of-day of this value at a fixed offset.
    ///
    /// Values without a zone take the default zone's offset at the current
    /// instant of `clock`.
    pub fn time_part(
        &self,
        resolver: &dyn ZoneResolver,
        clock: &dyn TimeSource,
    ) -> Result<TimeValue, TemporalError> {
        match self {
            Self::Time(time) => Ok(*time),
            Self::LocalTime(time) => {
                let offset = resolver.default_zone().current_offset(clock)?;
                TimeValue::from_local_nanos(local_nanos(time), offset)
            }
            Self::DateTime(date_time) => {
                let offset = ZoneOffset::from_fixed(*date_time.offset())?;
                TimeValue::from_local_nanos(local_nanos(&date_time.time()), offset)
            }
            Self::LocalDateTime(date_time) => {
                let offset = resolver.default_zone().current_offset(clock)?;
                TimeValue::from_local_nanos(local_nanos(&date_time.time()), offset)
            }
            Self::Date(date) => Err(TemporalError::Unsupported(format!(
                "cannot get the time of date {date}"
            ))),
        }
    }
}

impl From<TimeValue> for Temporal {
    fn from(time: TimeValue) -> Self {
        Self::Time(time)
    }
}

fn local_nanos(time: &NaiveTime) -> u64 {
    // Leap seconds are folded into the last nanosecond of the second.
    let nanos = u64::from(time.nanosecond()).min(NANOS_PER_SECOND - 1);
    u64::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND + nanos
}

//! Time units used for truncation.

use super::value::{NANOS_PER_DAY, NANOS_PER_SECOND};

/// Units a time-of-day can be truncated to, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeUnit {
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Length of the unit in nanoseconds.
    #[must_use]
    pub const fn nanos(self) -> u64 {
        match self {
            Self::Day => NANOS_PER_DAY,
            Self::Hour => 3600 * NANOS_PER_SECOND,
            Self::Minute => 60 * NANOS_PER_SECOND,
            Self::Second => NANOS_PER_SECOND,
            Self::Millisecond => 1_000_000,
            Self::Microsecond => 1_000,
            Self::Nanosecond => 1,
        }
    }

    /// Truncate a nanosecond-of-day to a multiple of this unit.
    #[must_use]
    pub const fn truncate(self, nanos_of_day: u64) -> u64 {
        let unit = self.nanos();
        nanos_of_day - nanos_of_day % unit
    }

    /// Parse a unit name as used by truncation requests (`"minute"`, `"ms"`...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "day" | "days" => Some(Self::Day),
            "hour" | "hours" | "h" => Some(Self::Hour),
            "minute" | "minutes" | "min" => Some(Self::Minute),
            "second" | "seconds" | "s" => Some(Self::Second),
            "millisecond" | "milliseconds" | "ms" => Some(Self::Millisecond),
            "microsecond" | "microseconds" | "us" => Some(Self::Microsecond),
            "nanosecond" | "nanoseconds" | "ns" => Some(Self::Nanosecond),
            _ => None,
        }
    }
}

//! Fixed UTC offsets.

use chrono::FixedOffset;

use super::error::TemporalError;
use super::parse;

/// Largest offset magnitude accepted, in seconds (18 hours).
pub const MAX_OFFSET_SECONDS: i32 = 18 * 3600;

/// A fixed, signed offset from UTC in whole seconds.
///
/// Parsed offsets have minute resolution; the value is kept in seconds so
/// instant arithmetic never has to convert units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ZoneOffset {
    seconds: i32,
}

impl ZoneOffset {
    /// The zero offset.
    pub const UTC: Self = Self { seconds: 0 };

    /// Create an offset from a total number of seconds east of UTC.
    pub fn from_seconds(seconds: i32) -> Result<Self, TemporalError> {
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(TemporalError::InvalidOffset {
                seconds: i64::from(seconds),
            });
        }
        Ok(Self { seconds })
    }

    /// Create an offset from hours and minutes, which must carry the same sign.
    pub fn from_hours_minutes(hours: i32, minutes: i32) -> Result<Self, TemporalError> {
        if !(-59..=59).contains(&minutes)
            || (hours > 0 && minutes < 0)
            || (hours < 0 && minutes > 0)
        {
            return Err(TemporalError::InvalidField {
                field: "offset minute",
                value: i64::from(minutes),
            });
        }
        if !(-18..=18).contains(&hours) {
            return Err(TemporalError::InvalidOffset {
                seconds: i64::from(hours) * 3600 + i64::from(minutes) * 60,
            });
        }
        Self::from_seconds(hours * 3600 + minutes * 60)
    }

    /// Convert from a chrono offset.
    pub fn from_fixed(offset: FixedOffset) -> Result<Self, TemporalError> {
        Self::from_seconds(offset.local_minus_utc())
    }

    /// Parse `Z` or `(+|-)HH[[:]MM]`.
    pub fn parse(text: &str) -> Result<Self, TemporalError> {
        parse::parse_offset(text)
    }

    #[must_use]
    pub const fn total_seconds(self) -> i32 {
        self.seconds
    }

    #[must_use]
    pub const fn is_utc(self) -> bool {
        self.seconds == 0
    }
}

impl std::fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let total = self.seconds.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
        write!(f, "{sign}{hours:02}:{minutes:02}")?;
        if seconds != 0 {
            write!(f, ":{seconds:02}")?;
        }
        Ok(())
    }
}

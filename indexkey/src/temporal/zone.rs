//! Time zones and the default-zone supplier.

use chrono::{DateTime, Local, TimeZone, Utc};

use super::error::TemporalError;
use super::offset::ZoneOffset;
use crate::time::{self, TimeSource};

/// A time zone whose offset can be resolved at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// A zone that is always at the same offset.
    Fixed(ZoneOffset),
    /// The host's local zone, including its daylight-saving rules.
    System,
}

impl Zone {
    pub const UTC: Self = Self::Fixed(ZoneOffset::UTC);

    /// Parse a zone: `system` / `local` or the offset grammar.
    pub fn parse(text: &str) -> Result<Self, TemporalError> {
        if text.eq_ignore_ascii_case("system") || text.eq_ignore_ascii_case("local") {
            return Ok(Self::System);
        }
        ZoneOffset::parse(text).map(Self::Fixed)
    }

    /// Offset of this zone at `at`.
    pub fn offset_at(&self, at: DateTime<Utc>) -> Result<ZoneOffset, TemporalError> {
        match self {
            Self::Fixed(offset) => Ok(*offset),
            Self::System => ZoneOffset::from_fixed(Local.offset_from_utc_datetime(&at.naive_utc())),
        }
    }

    /// Offset of this zone at the current instant of `clock`.
    pub fn current_offset(&self, clock: &dyn TimeSource) -> Result<ZoneOffset, TemporalError> {
        self.offset_at(time::now_utc(clock))
    }
}

impl From<ZoneOffset> for Zone {
    fn from(offset: ZoneOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(offset) => std::fmt::Display::fmt(offset, f),
            Self::System => f.write_str("system"),
        }
    }
}

/// Supplies the zone to use when a value does not carry one.
///
/// The supplier is consulted at parse/build time, never deferred.
pub trait ZoneResolver {
    fn default_zone(&self) -> Zone;
}

impl ZoneResolver for Zone {
    fn default_zone(&self) -> Zone {
        *self
    }
}

impl<F> ZoneResolver for F
where
    F: Fn() -> Zone,
{
    fn default_zone(&self) -> Zone {
        self()
    }
}

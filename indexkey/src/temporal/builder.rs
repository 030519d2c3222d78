//! Field-selection builder for times.
//!
//! A build merges three inputs in a fixed sequence:
//!
//! 1. The base: the time part of the selected source, or midnight in the
//!    override zone (falling back to the default zone) when nothing is selected.
//! 2. Clock-field overrides (hour, minute, second, sub-second groups).
//! 3. The timezone override. If the selected source carried a zone, the
//!    shift keeps the instant ("view this instant through that zone");
//!    otherwise it keeps the local time ("this wall-clock time, in that zone").

use super::error::TemporalError;
use super::fields::{self, TimeFields};
use super::source::Temporal;
use super::value::TimeValue;
use super::zone::{Zone, ZoneResolver};
use crate::time::TimeSource;

/// Builds a `TimeValue` from an optional source and field overrides.
#[derive(Debug, Clone, Default)]
pub struct TimeBuilder {
    source: Option<Temporal>,
    fields: TimeFields,
}

impl TimeBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source: None,
            fields: TimeFields::new(),
        }
    }

    /// Select the time part of `source` as the base value.
    #[must_use]
    pub const fn select(mut self, source: Temporal) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the field overrides.
    #[must_use]
    pub const fn with_fields(mut self, fields: TimeFields) -> Self {
        self.fields = fields;
        self
    }

    /// Shortcut for selecting a time out of `source`, optionally viewed
    /// through `timezone`.
    pub fn select_time(
        source: Temporal,
        timezone: Option<Zone>,
        resolver: &dyn ZoneResolver,
        clock: &dyn TimeSource,
    ) -> Result<TimeValue, TemporalError> {
        let fields = TimeFields {
            timezone,
            ..TimeFields::new()
        };
        Self::new().select(source).with_fields(fields).build(resolver, clock)
    }

    pub fn build(
        &self,
        resolver: &dyn ZoneResolver,
        clock: &dyn TimeSource,
    ) -> Result<TimeValue, TemporalError> {
        if let Some(source) = &self.source {
            if !source.capabilities().has_time {
                return Err(TemporalError::Unsupported(format!(
                    "cannot construct time from {}",
                    source.type_name()
                )));
            }
            if self.fields.is_empty() {
                return source.time_part(resolver, clock);
            }
        }

        let (base, source_has_zone) = match &self.source {
            Some(source) => (
                source.time_part(resolver, clock)?,
                source.capabilities().has_zone,
            ),
            None => {
                let zone = self
                    .fields
                    .timezone
                    .unwrap_or_else(|| resolver.default_zone());
                (TimeValue::from_local_nanos(0, zone.current_offset(clock)?)?, false)
            }
        };

        let result = fields::apply_clock_fields(&base, &self.fields)?;

        let Some(zone) = self.fields.timezone else {
            return Ok(result);
        };
        let offset = zone.current_offset(clock)?;
        if source_has_zone {
            Ok(result.with_offset_same_instant(offset))
        } else {
            Ok(result.with_offset_same_local(offset))
        }
    }
}

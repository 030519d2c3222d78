//! Field overrides and the field-merge algorithm.
//!
//! Overrides are a fixed set of optional fields, merged in a hardcoded
//! order: timezone, hour, minute, second, then the sub-second group.

use super::error::TemporalError;
use super::unit::TimeUnit;
use super::value::{TimeValue, check_field};
use super::zone::Zone;

/// Optional field overrides for building or truncating a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFields {
    pub hour: Option<i64>,
    pub minute: Option<i64>,
    pub second: Option<i64>,
    pub millisecond: Option<i64>,
    pub microsecond: Option<i64>,
    pub nanosecond: Option<i64>,
    pub timezone: Option<Zone>,
}

impl TimeFields {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hour: None,
            minute: None,
            second: None,
            millisecond: None,
            microsecond: None,
            nanosecond: None,
            timezone: None,
        }
    }

    #[must_use]
    pub const fn hour(mut self, hour: i64) -> Self {
        self.hour = Some(hour);
        self
    }

    #[must_use]
    pub const fn minute(mut self, minute: i64) -> Self {
        self.minute = Some(minute);
        self
    }

    #[must_use]
    pub const fn second(mut self, second: i64) -> Self {
        self.second = Some(second);
        self
    }

    #[must_use]
    pub const fn millisecond(mut self, millisecond: i64) -> Self {
        self.millisecond = Some(millisecond);
        self
    }

    #[must_use]
    pub const fn microsecond(mut self, microsecond: i64) -> Self {
        self.microsecond = Some(microsecond);
        self
    }

    #[must_use]
    pub const fn nanosecond(mut self, nanosecond: i64) -> Self {
        self.nanosecond = Some(nanosecond);
        self
    }

    #[must_use]
    pub const fn timezone(mut self, zone: Zone) -> Self {
        self.timezone = Some(zone);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.timezone.is_none() && !self.has_clock_fields()
    }

    /// Whether any field other than `timezone` is set.
    #[must_use]
    pub const fn has_clock_fields(&self) -> bool {
        self.hour.is_some()
            || self.minute.is_some()
            || self.second.is_some()
            || self.has_subsecond_fields()
    }

    #[must_use]
    pub const fn has_subsecond_fields(&self) -> bool {
        self.millisecond.is_some() || self.microsecond.is_some() || self.nanosecond.is_some()
    }

    #[must_use]
    pub const fn without_timezone(&self) -> Self {
        let mut fields = *self;
        fields.timezone = None;
        fields
    }
}

/// Fill in the sub-second groups that a truncation to `unit` left behind.
///
/// Truncating to a millisecond and overriding only `microsecond` must keep
/// the truncated millisecond digits; missing groups are taken from
/// `truncated`, explicit groups are left untouched.
pub fn reconcile_subseconds(fields: &mut TimeFields, unit: TimeUnit, truncated: &TimeValue) {
    let nanos = i64::from(truncated.nanosecond());
    match unit {
        TimeUnit::Millisecond if fields.has_subsecond_fields() => {
            fields.millisecond = fields.millisecond.or(Some(nanos / 1_000_000));
            fields.microsecond = fields.microsecond.or(Some((nanos / 1_000) % 1_000));
            fields.nanosecond = fields.nanosecond.or(Some(nanos % 1_000));
        }
        TimeUnit::Microsecond if fields.microsecond.is_some() || fields.nanosecond.is_some() => {
            fields.microsecond = fields.microsecond.or(Some(nanos / 1_000));
            fields.nanosecond = fields.nanosecond.or(Some(nanos % 1_000));
        }
        _ => {}
    }
}

/// Apply every clock field of `fields` to `base`. The timezone is not touched.
pub fn apply_clock_fields(
    base: &TimeValue,
    fields: &TimeFields,
) -> Result<TimeValue, TemporalError> {
    let hour = override_or(fields.hour, base.hour(), "hour", 23)?;
    let minute = override_or(fields.minute, base.minute(), "minute", 59)?;
    let second = override_or(fields.second, base.second(), "second", 59)?;
    let nanosecond = merge_subseconds(fields, base.nanosecond())?;
    TimeValue::of(hour, minute, second, nanosecond, base.offset())
}

fn override_or(
    value: Option<i64>,
    current: u32,
    field: &'static str,
    max: i64,
) -> Result<u32, TemporalError> {
    value.map_or(Ok(current), |value| {
        check_field(field, value, max)?;
        u32::try_from(value).map_err(|_| TemporalError::InvalidField { field, value })
    })
}

/// Combine the sub-second overrides into a nanosecond-of-second.
///
/// The coarsest group present may span the whole second; every finer group
/// is limited to three digits.
fn merge_subseconds(fields: &TimeFields, current: u32) -> Result<u32, TemporalError> {
    let total = match (fields.millisecond, fields.microsecond, fields.nanosecond) {
        (None, None, None) => return Ok(current),
        (Some(millis), micros, nanos) => {
            check_field("millisecond", millis, 999)?;
            let micros = micros.unwrap_or(0);
            check_field("microsecond", micros, 999)?;
            let nanos = nanos.unwrap_or(0);
            check_field("nanosecond", nanos, 999)?;
            millis * 1_000_000 + micros * 1_000 + nanos
        }
        (None, Some(micros), nanos) => {
            check_field("microsecond", micros, 999_999)?;
            let nanos = nanos.unwrap_or(0);
            check_field("nanosecond", nanos, 999)?;
            micros * 1_000 + nanos
        }
        (None, None, Some(nanos)) => {
            check_field("nanosecond", nanos, 999_999_999)?;
            nanos
        }
    };
    u32::try_from(total).map_err(|_| TemporalError::InvalidField {
        field: "nanosecond",
        value: total,
    })
}

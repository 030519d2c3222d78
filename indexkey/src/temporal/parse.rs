//! Regex-driven parsing of offsets and times.
//!
//! Grammar:
//!
//! ```text
//! offset := Z | (+|-) HH [ [:] MM ]
//! time   := [T] HH [ : MM [ : SS [ (.|,) fraction ] ] ] [offset]
//!         | [T] HH [ MM [ SS [ (.|,) fraction ] ] ] [offset]
//! ```
//!
//! Fractions carry 1 to 9 digits and are right-padded to nanoseconds.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::error::TemporalError;
use super::offset::ZoneOffset;
use super::value::TimeValue;
use super::zone::ZoneResolver;
use crate::time::TimeSource;

const OFFSET_PATTERN: &str = r"(?P<zone>[Zz]|[+-](?P<zone_hour>[0-9]{2})(?::?(?P<zone_minute>[0-9]{2}))?)";

const LONG_TIME_PATTERN: &str = r"(?P<hour>[0-9]{2})(?::(?P<minute>[0-9]{2})(?::(?P<second>[0-9]{2})(?:[.,](?P<fraction>[0-9]{1,9}))?)?)?";

const SHORT_TIME_PATTERN: &str = r"(?P<short_hour>[0-9]{2})(?:(?P<short_minute>[0-9]{2})(?:(?P<short_second>[0-9]{2})(?:[.,](?P<short_fraction>[0-9]{1,9}))?)?)?";

static OFFSET: LazyLock<Regex> = LazyLock::new(|| compile(&format!("^{OFFSET_PATTERN}$")));

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        "^T?(?:{LONG_TIME_PATTERN}|{SHORT_TIME_PATTERN})(?:{OFFSET_PATTERN})?$"
    ))
});

// Only ever called with the constant patterns above.
#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// Parse a bare offset: `Z` or `(+|-)HH[[:]MM]`.
pub fn parse_offset(text: &str) -> Result<ZoneOffset, TemporalError> {
    let captures = OFFSET.captures(text).ok_or_else(|| TemporalError::Parse {
        text: text.to_owned(),
    })?;
    offset_from_captures(&captures, text)?.ok_or_else(|| TemporalError::Parse {
        text: text.to_owned(),
    })
}

/// Parse a time, resolving the default zone when the text has no offset.
pub fn parse_time(
    text: &str,
    resolver: &dyn ZoneResolver,
    clock: &dyn TimeSource,
) -> Result<TimeValue, TemporalError> {
    let captures = TIME.captures(text).ok_or_else(|| TemporalError::Parse {
        text: text.to_owned(),
    })?;

    let (hour, minute, second, fraction) = if captures.name("hour").is_some() {
        (
            number(&captures, "hour", text)?,
            number(&captures, "minute", text)?,
            number(&captures, "second", text)?,
            captures.name("fraction"),
        )
    } else {
        (
            number(&captures, "short_hour", text)?,
            number(&captures, "short_minute", text)?,
            number(&captures, "short_second", text)?,
            captures.name("short_fraction"),
        )
    };
    let nanosecond = fraction.map_or(0, |digits| fraction_nanos(digits.as_str()));

    let offset = match offset_from_captures(&captures, text)? {
        Some(offset) => offset,
        None => resolver.default_zone().current_offset(clock)?,
    };

    TimeValue::of(hour, minute, second, nanosecond, offset)
}

fn offset_from_captures(
    captures: &Captures<'_>,
    text: &str,
) -> Result<Option<ZoneOffset>, TemporalError> {
    let Some(zone) = captures.name("zone") else {
        return Ok(None);
    };
    if zone.as_str().eq_ignore_ascii_case("z") {
        return Ok(Some(ZoneOffset::UTC));
    }
    let factor = if zone.as_str().starts_with('-') { -1 } else { 1 };
    let hours = i32::try_from(number(captures, "zone_hour", text)?).unwrap_or(i32::MAX);
    let minutes = i32::try_from(number(captures, "zone_minute", text)?).unwrap_or(i32::MAX);
    ZoneOffset::from_hours_minutes(factor * hours, factor * minutes).map(Some)
}

/// An optional numeric group; absent groups read as zero.
fn number(captures: &Captures<'_>, group: &str, text: &str) -> Result<u32, TemporalError> {
    captures.name(group).map_or(Ok(0), |digits| {
        digits.as_str().parse().map_err(|_| TemporalError::Parse {
            text: text.to_owned(),
        })
    })
}

fn fraction_nanos(digits: &str) -> u32 {
    // At most nine ASCII digits, so the fold cannot overflow.
    let value = digits
        .bytes()
        .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
    let missing = 9 - u32::try_from(digits.len()).unwrap_or(9).min(9);
    value * 10u32.pow(missing)
}

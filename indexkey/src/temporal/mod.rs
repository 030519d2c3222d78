//! Temporal value model.
//!
//! A `TimeValue` is a time-of-day at a fixed UTC offset. It is built from
//! explicit fields, from text, from a UTC nanosecond count, from the clock,
//! or through `TimeBuilder`, which merges a source value, field overrides and
//! a default-zone supplier.
//!
//! # Usage
//!
//! ```
//! use indexkey::temporal::{TimeUnit, TimeValue, TimeFields, Temporal, Zone};
//! use indexkey::time::FixedTimeSource;
//!
//! let clock = FixedTimeSource(0);
//! let a = TimeValue::parse("14:30+01:00", &Zone::UTC, &clock).unwrap();
//! let b = TimeValue::parse("13:30Z", &Zone::UTC, &clock).unwrap();
//! assert_eq!(a, b);
//!
//! let t = TimeValue::parse("16:47:22.123+02:00", &Zone::UTC, &clock).unwrap();
//! let minute = TimeValue::truncate(
//!     TimeUnit::Minute,
//!     &Temporal::Time(t),
//!     &TimeFields::new(),
//!     &Zone::UTC,
//!     &clock,
//! )
//! .unwrap();
//! assert_eq!(minute.to_string(), "16:47+02:00");
//! ```

mod builder;
mod duration;
mod error;
mod fields;
mod offset;
mod parse;
mod source;
mod unit;
mod value;
mod zone;

pub use builder::TimeBuilder;
pub use duration::Duration;
pub use error::TemporalError;
pub use fields::TimeFields;
pub use offset::{MAX_OFFSET_SECONDS, ZoneOffset};
pub use source::{Capabilities, Temporal};
pub use unit::TimeUnit;
pub use value::{NANOS_PER_DAY, NANOS_PER_SECOND, SECONDS_PER_DAY, TimeValue};
pub use zone::{Zone, ZoneResolver};

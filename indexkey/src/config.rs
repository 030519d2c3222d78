//! Index key configuration.
//!
//! Configuration is loaded from environment variables once, when a store
//! opens, and handed to the layout registry.
//!
//! # Environment Variables
//!
//! - `INDEXKEY_DEFAULT_TIMEZONE`: zone for times written without an offset,
//!   as offset text (`Z`, `+01:00`) or `system` (default: `Z`)
//! - `INDEXKEY_CARTESIAN_MIN`: lower bound of Cartesian curves on every axis (default: `-1000000`)
//! - `INDEXKEY_CARTESIAN_MAX`: upper bound of Cartesian curves on every axis (default: `1000000`)
//! - `INDEXKEY_CURVE_LEVELS_2D`: curve bits per dimension for 2D systems (default: `30`)
//! - `INDEXKEY_CURVE_LEVELS_3D`: curve bits per dimension for 3D systems (default: `20`)
//!
//! # Invariants
//!
//! - `cartesian_min < cartesian_max`, both finite
//! - curve levels are at least 1 and fit a 64-bit ordinate
//!
//! Curve bounds and levels shape every spatial key, so changing them makes
//! existing spatial trees unreadable; tree metadata records a fingerprint
//! of them and refuses the open.

use tracing::debug;

use crate::spatial::{
    CoordinateReferenceSystem, DEFAULT_CARTESIAN_EXTENT, Envelope, HilbertCurve,
};
use crate::temporal::{Zone, ZoneResolver};

/// Index key configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Zone supplied to times parsed or built without an explicit offset.
    pub default_timezone: Zone,
    /// Lower bound of Cartesian curve envelopes on every axis.
    pub cartesian_min: f64,
    /// Upper bound of Cartesian curve envelopes on every axis.
    pub cartesian_max: f64,
    /// Bits per dimension for 2D curves.
    pub curve_levels_2d: u32,
    /// Bits per dimension for 3D curves.
    pub curve_levels_3d: u32,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_TIMEZONE_VAR: &str = "INDEXKEY_DEFAULT_TIMEZONE";
const CARTESIAN_MIN_VAR: &str = "INDEXKEY_CARTESIAN_MIN";
const CARTESIAN_MAX_VAR: &str = "INDEXKEY_CARTESIAN_MAX";
const CURVE_LEVELS_2D_VAR: &str = "INDEXKEY_CURVE_LEVELS_2D";
const CURVE_LEVELS_3D_VAR: &str = "INDEXKEY_CURVE_LEVELS_3D";

impl IndexConfig {
    /// Default bits per dimension for 2D curves.
    pub const DEFAULT_CURVE_LEVELS_2D: u32 = 30;
    /// Default bits per dimension for 3D curves.
    pub const DEFAULT_CURVE_LEVELS_3D: u32 = 20;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse or violates
    /// the invariants above.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let default_timezone = match lookup(DEFAULT_TIMEZONE_VAR) {
            Some(value) => Zone::parse(&value).map_err(|e| invalid(DEFAULT_TIMEZONE_VAR, e))?,
            None => defaults.default_timezone,
        };
        let cartesian_min = load_float(&lookup, CARTESIAN_MIN_VAR, defaults.cartesian_min)?;
        let cartesian_max = load_float(&lookup, CARTESIAN_MAX_VAR, defaults.cartesian_max)?;
        if cartesian_min >= cartesian_max {
            return Err(invalid(
                CARTESIAN_MAX_VAR,
                format!(
                    "{cartesian_max} must be greater than {CARTESIAN_MIN_VAR} ({cartesian_min})"
                ),
            ));
        }
        let curve_levels_2d =
            load_levels(&lookup, CURVE_LEVELS_2D_VAR, 2, defaults.curve_levels_2d)?;
        let curve_levels_3d =
            load_levels(&lookup, CURVE_LEVELS_3D_VAR, 3, defaults.curve_levels_3d)?;

        let config = Self {
            default_timezone,
            cartesian_min,
            cartesian_max,
            curve_levels_2d,
            curve_levels_3d,
        };
        debug!(?config, "loaded index key configuration");
        Ok(config)
    }

    /// Curve bits per dimension for `crs`.
    #[must_use]
    pub const fn levels_for(&self, crs: CoordinateReferenceSystem) -> u32 {
        if crs.dimension() == 2 {
            self.curve_levels_2d
        } else {
            self.curve_levels_3d
        }
    }

    /// Curve envelope for `crs`. Cartesian systems use the configured
    /// bounds; geographic systems use their fixed extent.
    #[must_use]
    pub fn envelope_for(&self, crs: CoordinateReferenceSystem) -> Envelope {
        let (lo, hi) = (self.cartesian_min, self.cartesian_max);
        match crs {
            CoordinateReferenceSystem::Cartesian => {
                Envelope::from_arrays(2, [lo, lo, 0.0], [hi, hi, 0.0])
            }
            CoordinateReferenceSystem::Cartesian3D => Envelope::from_arrays(3, [lo; 3], [hi; 3]),
            CoordinateReferenceSystem::Wgs84 | CoordinateReferenceSystem::Wgs84_3D => {
                crs.default_curve_envelope()
            }
        }
    }
}

/// Times without an offset take the configured default zone.
impl ZoneResolver for IndexConfig {
    fn default_zone(&self) -> Zone {
        self.default_timezone
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            default_timezone: Zone::UTC,
            cartesian_min: -DEFAULT_CARTESIAN_EXTENT,
            cartesian_max: DEFAULT_CARTESIAN_EXTENT,
            curve_levels_2d: Self::DEFAULT_CURVE_LEVELS_2D,
            curve_levels_3d: Self::DEFAULT_CURVE_LEVELS_3D,
        }
    }
}

fn invalid(name: &str, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: message.to_string(),
    }
}

fn load_float(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(invalid(name, format!("'{value}' is not a finite number"))),
    }
}

fn load_levels(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    dimension: usize,
    default: u32,
) -> Result<u32, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    let max = HilbertCurve::max_levels(dimension);
    match value.trim().parse::<u32>() {
        Ok(levels) if (1..=max).contains(&levels) => Ok(levels),
        _ => Err(invalid(name, format!("'{value}' is not a level count between 1 and {max}"))),
    }
}

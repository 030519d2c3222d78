//! Spatial value errors.

use super::crs::CoordinateReferenceSystem;

/// Errors from the spatial value model and its curves.
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// The coordinate count does not match the reference system.
    DimensionMismatch {
        crs: CoordinateReferenceSystem,
        expected: usize,
        actual: usize,
    },
    /// A coordinate lies outside the reference system's declared bounds.
    OutOfBounds {
        crs: CoordinateReferenceSystem,
        axis: usize,
        value: f64,
        min: f64,
        max: f64,
    },
    /// No built-in reference system has this name or code.
    UnknownCrs(String),
    /// A point of one reference system was given to a layout of another.
    CrsMismatch {
        expected: CoordinateReferenceSystem,
        found: CoordinateReferenceSystem,
    },
    /// Curve settings that cannot produce a 64-bit ordinate.
    InvalidCurve(String),
}

impl std::fmt::Display for SpatialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch {
                crs,
                expected,
                actual,
            } => write!(
                f,
                "{crs} points have {expected} coordinates, got {actual}"
            ),
            Self::OutOfBounds {
                crs,
                axis,
                value,
                min,
                max,
            } => write!(
                f,
                "{crs} coordinate {axis} = {value} is outside [{min}, {max}]"
            ),
            Self::UnknownCrs(name) => write!(f, "unknown coordinate reference system: {name}"),
            Self::CrsMismatch { expected, found } => {
                write!(f, "expected a {expected} point, got {found}")
            }
            Self::InvalidCurve(message) => write!(f, "invalid curve settings: {message}"),
        }
    }
}

impl std::error::Error for SpatialError {}

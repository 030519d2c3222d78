//! Built-in coordinate reference systems.

use super::envelope::Envelope;
use super::error::SpatialError;

/// Half-width of the default Cartesian curve extent on every axis.
pub const DEFAULT_CARTESIAN_EXTENT: f64 = 1_000_000.0;

/// Default height extent of the 3D geographic curve, in meters.
pub const DEFAULT_HEIGHT_EXTENT: f64 = 1_000_000.0;

/// A named coordinate system with a fixed dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoordinateReferenceSystem {
    Cartesian,
    Cartesian3D,
    Wgs84,
    #[allow(non_camel_case_types)]
    Wgs84_3D,
}

impl CoordinateReferenceSystem {
    pub const ALL: [Self; 4] = [Self::Cartesian, Self::Cartesian3D, Self::Wgs84, Self::Wgs84_3D];

    /// SRID code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Cartesian => 7203,
            Self::Cartesian3D => 9157,
            Self::Wgs84 => 4326,
            Self::Wgs84_3D => 4979,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cartesian => "cartesian",
            Self::Cartesian3D => "cartesian-3d",
            Self::Wgs84 => "wgs-84",
            Self::Wgs84_3D => "wgs-84-3d",
        }
    }

    #[must_use]
    pub const fn dimension(self) -> usize {
        match self {
            Self::Cartesian | Self::Wgs84 => 2,
            Self::Cartesian3D | Self::Wgs84_3D => 3,
        }
    }

    #[must_use]
    pub const fn is_geographic(self) -> bool {
        matches!(self, Self::Wgs84 | Self::Wgs84_3D)
    }

    pub fn from_code(code: u32) -> Result<Self, SpatialError> {
        Self::ALL
            .into_iter()
            .find(|crs| crs.code() == code)
            .ok_or_else(|| SpatialError::UnknownCrs(code.to_string()))
    }

    pub fn from_name(name: &str) -> Result<Self, SpatialError> {
        Self::ALL
            .into_iter()
            .find(|crs| crs.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SpatialError::UnknownCrs(name.to_owned()))
    }

    /// Valid range of `axis`. Cartesian axes and heights are unbounded.
    #[must_use]
    pub const fn axis_bounds(self, axis: usize) -> (f64, f64) {
        match (self.is_geographic(), axis) {
            (true, 0) => (-180.0, 180.0),
            (true, 1) => (-90.0, 90.0),
            _ => (f64::MIN, f64::MAX),
        }
    }

    /// The extent a space-filling curve covers by default for this system.
    #[must_use]
    pub fn default_curve_envelope(self) -> Envelope {
        let c = DEFAULT_CARTESIAN_EXTENT;
        let h = DEFAULT_HEIGHT_EXTENT;
        match self {
            Self::Cartesian => Envelope::from_arrays(2, [-c, -c, 0.0], [c, c, 0.0]),
            Self::Cartesian3D => Envelope::from_arrays(3, [-c, -c, -c], [c, c, c]),
            Self::Wgs84 => Envelope::from_arrays(2, [-180.0, -90.0, 0.0], [180.0, 90.0, 0.0]),
            Self::Wgs84_3D => Envelope::from_arrays(3, [-180.0, -90.0, -h], [180.0, 90.0, h]),
        }
    }
}

impl std::fmt::Display for CoordinateReferenceSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::crs::CoordinateReferenceSystem;
use super::curve::SpaceFillingCurve;
use super::envelope::MAX_DIMENSION;
use super::error::SpatialError;

/// A point in one of the built-in coordinate reference systems.
///
/// Equality is exact on the coordinate bit patterns, so `-0.0` and `0.0`
/// are different points. Points have no natural order; index order comes
/// from a curve via [`PointValue::compare_on_curve`].
#[derive(Debug, Clone, Copy)]
pub struct PointValue {
    crs: CoordinateReferenceSystem,
    coords: [f64; MAX_DIMENSION],
}

impl PointValue {
    /// Validate `coords` against `crs` and build a point.
    pub fn new(crs: CoordinateReferenceSystem, coords: &[f64]) -> Result<Self, SpatialError> {
        if coords.len() != crs.dimension() {
            return Err(SpatialError::DimensionMismatch {
                crs,
                expected: crs.dimension(),
                actual: coords.len(),
            });
        }
        let mut stored = [0.0; MAX_DIMENSION];
        for (axis, &value) in coords.iter().enumerate() {
            let (min, max) = crs.axis_bounds(axis);
            if !value.is_finite() || value < min || value > max {
                return Err(SpatialError::OutOfBounds {
                    crs,
                    axis,
                    value,
                    min,
                    max,
                });
            }
            stored[axis] = value;
        }
        Ok(Self { crs, coords: stored })
    }

    #[must_use]
    pub const fn crs(&self) -> CoordinateReferenceSystem {
        self.crs
    }

    #[must_use]
    pub fn coordinates(&self) -> &[f64] {
        &self.coords[..self.crs.dimension()]
    }

    /// Ordinate of this point on `curve`.
    pub fn curve_ordinate(&self, curve: &dyn SpaceFillingCurve) -> Result<u64, SpatialError> {
        curve.ordinate(self.coordinates())
    }

    /// Order two points of the same system by curve position, then by raw
    /// coordinates to break ties between points sharing a cell.
    pub fn compare_on_curve(
        &self,
        other: &Self,
        curve: &dyn SpaceFillingCurve,
    ) -> Result<Ordering, SpatialError> {
        if self.crs != other.crs {
            return Err(SpatialError::CrsMismatch {
                expected: self.crs,
                found: other.crs,
            });
        }
        let by_curve = self.curve_ordinate(curve)?.cmp(&other.curve_ordinate(curve)?);
        Ok(by_curve.then_with(|| {
            self.coordinates()
                .iter()
                .zip(other.coordinates())
                .map(|(a, b)| a.total_cmp(b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        }))
    }
}

impl PartialEq for PointValue {
    fn eq(&self, other: &Self) -> bool {
        self.crs == other.crs
            && self
                .coordinates()
                .iter()
                .zip(other.coordinates())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for PointValue {}

impl Hash for PointValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.crs.hash(state);
        for value in self.coordinates() {
            value.to_bits().hash(state);
        }
    }
}

impl std::fmt::Display for PointValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "point({}", self.crs)?;
        for value in self.coordinates() {
            write!(f, " {value}")?;
        }
        f.write_str(")")
    }
}

//! Axis-aligned bounding boxes of up to three dimensions.

use super::error::SpatialError;

/// Largest dimensionality supported by the built-in reference systems.
pub const MAX_DIMENSION: usize = 3;

/// An axis-aligned box `[min, max]` on every axis.
///
/// Stored inline so curve arithmetic never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    dimension: usize,
    min: [f64; MAX_DIMENSION],
    max: [f64; MAX_DIMENSION],
}

impl Envelope {
    /// Create an envelope from per-axis bounds.
    pub fn new(min: &[f64], max: &[f64]) -> Result<Self, SpatialError> {
        if min.len() != max.len() || min.is_empty() || min.len() > MAX_DIMENSION {
            return Err(SpatialError::InvalidCurve(format!(
                "envelope needs 1 to {MAX_DIMENSION} matching axes, got {} and {}",
                min.len(),
                max.len()
            )));
        }
        let mut envelope = Self::from_arrays(min.len(), [0.0; MAX_DIMENSION], [0.0; MAX_DIMENSION]);
        for (axis, (&lo, &hi)) in min.iter().zip(max).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(SpatialError::InvalidCurve(format!(
                    "axis {axis} has empty or non-finite range [{lo}, {hi}]"
                )));
            }
            envelope.min[axis] = lo;
            envelope.max[axis] = hi;
        }
        Ok(envelope)
    }

    pub(crate) const fn from_arrays(
        dimension: usize,
        min: [f64; MAX_DIMENSION],
        max: [f64; MAX_DIMENSION],
    ) -> Self {
        Self {
            dimension,
            min,
            max,
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn min(&self) -> &[f64] {
        &self.min[..self.dimension]
    }

    #[must_use]
    pub fn max(&self) -> &[f64] {
        &self.max[..self.dimension]
    }

    #[must_use]
    pub fn width(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// Whether `coords` lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, coords: &[f64]) -> bool {
        coords.len() == self.dimension
            && coords
                .iter()
                .enumerate()
                .all(|(axis, &value)| value >= self.min[axis] && value <= self.max[axis])
    }

    #[must_use]
    pub fn contains_envelope(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && (0..self.dimension)
                .all(|axis| other.min[axis] >= self.min[axis] && other.max[axis] <= self.max[axis])
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && (0..self.dimension)
                .all(|axis| other.min[axis] <= self.max[axis] && other.max[axis] >= self.min[axis])
    }
}

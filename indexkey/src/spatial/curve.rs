//! Space-filling curves mapping coordinates to one sortable integer.
//!
//! The index only needs two capabilities from a curve: coordinates to
//! ordinate, and ordinate (or ordinate prefix) to the box of space it
//! covers. `SpaceFillingCurve` is that seam; `HilbertCurve` is the built-in
//! implementation.
//!
//! Ordinates are approximate: points close on the curve are close in space,
//! but a range of ordinates covers whole cells, so range scans return
//! candidates that the caller must post-filter against true coordinates.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use std::ops::RangeInclusive;

use super::envelope::{Envelope, MAX_DIMENSION};
use super::error::SpatialError;

/// Maps coordinates within a fixed envelope to a single `u64` ordinate.
pub trait SpaceFillingCurve: std::fmt::Debug + Send + Sync {
    fn envelope(&self) -> &Envelope;

    /// Bits of precision per dimension.
    fn levels(&self) -> u32;

    fn dimension(&self) -> usize {
        self.envelope().dimension()
    }

    /// Ordinate of the finest cell containing `coords`.
    ///
    /// Coordinates outside the envelope are clamped onto its edge cells.
    fn ordinate(&self, coords: &[f64]) -> Result<u64, SpatialError>;

    /// Box covered by the cell whose first `depth` levels are `prefix`.
    fn prefix_envelope(&self, prefix: u64, depth: u32) -> Envelope;

    /// Box covered by the finest cell with this ordinate.
    fn cell_envelope(&self, ordinate: u64) -> Envelope {
        self.prefix_envelope(ordinate, self.levels())
    }

    /// Sorted, merged ordinate ranges whose cells may hold points inside
    /// `search`, refining at most `max_depth` levels.
    ///
    /// Clamped points count: a search beyond the envelope still reaches the
    /// edge cells those points were clamped onto.
    fn ranges_intersecting(&self, search: &Envelope, max_depth: u32) -> Vec<RangeInclusive<u64>>;
}

/// N-dimensional Hilbert curve (Skilling's transform).
#[derive(Debug, Clone, PartialEq)]
pub struct HilbertCurve {
    envelope: Envelope,
    levels: u32,
}

impl HilbertCurve {
    /// Create a curve over `envelope` with `levels` bits per dimension.
    ///
    /// `levels * dimension` must fit in the 64-bit ordinate.
    pub fn new(envelope: Envelope, levels: u32) -> Result<Self, SpatialError> {
        let dimension = envelope.dimension();
        if dimension < 2 {
            return Err(SpatialError::InvalidCurve(format!(
                "a curve needs at least 2 dimensions, got {dimension}"
            )));
        }
        if levels == 0 || levels as usize * dimension > 64 {
            return Err(SpatialError::InvalidCurve(format!(
                "{levels} levels in {dimension} dimensions do not fit 64 bits"
            )));
        }
        Ok(Self { envelope, levels })
    }

    /// Largest level count whose ordinate still fits in 64 bits.
    #[must_use]
    pub const fn max_levels(dimension: usize) -> u32 {
        (64 / dimension) as u32
    }

    /// Integer cell of `value` on `axis`, clamped to the grid.
    fn normalize(&self, axis: usize, value: f64) -> u64 {
        let cells = 1u64 << self.levels;
        let fraction = (value - self.envelope.min()[axis]) / self.envelope.width(axis);
        let cell = (fraction * cells as f64).floor();
        if cell <= 0.0 {
            0
        } else if cell >= (cells - 1) as f64 {
            cells - 1
        } else {
            cell as u64
        }
    }

    /// Grid position of the cell `prefix` at `depth`, one entry per axis.
    fn cell_axes(&self, prefix: u64, depth: u32) -> [u64; MAX_DIMENSION] {
        let mut axes = [0u64; MAX_DIMENSION];
        if depth > 0 {
            let dimension = self.dimension();
            deinterleave(prefix, depth, &mut axes[..dimension]);
            transpose_to_axes(&mut axes[..dimension], depth);
        }
        axes
    }

    /// Space whose points land in the cell `prefix` at `depth`.
    ///
    /// Points outside the envelope are clamped onto edge cells, so an edge
    /// cell reaches to infinity on its outer sides.
    fn reach(&self, prefix: u64, depth: u32) -> Envelope {
        let depth = depth.min(self.levels);
        let cell = self.prefix_envelope(prefix, depth);
        let axes = self.cell_axes(prefix, depth);
        let last = (1u64 << depth) - 1;
        let mut min = [0.0; MAX_DIMENSION];
        let mut max = [0.0; MAX_DIMENSION];
        for axis in 0..self.dimension() {
            min[axis] = if axes[axis] == 0 { f64::NEG_INFINITY } else { cell.min()[axis] };
            max[axis] = if axes[axis] == last { f64::INFINITY } else { cell.max()[axis] };
        }
        Envelope::from_arrays(self.dimension(), min, max)
    }

    /// Ordinate range covered by `prefix` at `depth`.
    fn prefix_range(&self, prefix: u64, depth: u32) -> RangeInclusive<u64> {
        let shift = self.dimension() as u32 * (self.levels - depth);
        let start = prefix.checked_shl(shift).unwrap_or(0);
        let span = if shift == 0 { 0 } else { u64::MAX >> (64 - shift) };
        start..=start + span
    }

    fn collect(
        &self,
        prefix: u64,
        depth: u32,
        max_depth: u32,
        search: &Envelope,
        out: &mut Vec<RangeInclusive<u64>>,
    ) {
        let cell = self.reach(prefix, depth);
        if !cell.intersects(search) {
            return;
        }
        if depth == max_depth || search.contains_envelope(&cell) {
            let range = self.prefix_range(prefix, depth);
            match out.last_mut() {
                Some(last) if last.end().checked_add(1) == Some(*range.start()) => {
                    *last = *last.start()..=*range.end();
                }
                _ => out.push(range),
            }
            return;
        }
        let dimension = self.dimension();
        for child in 0..(1u64 << dimension) {
            self.collect((prefix << dimension) | child, depth + 1, max_depth, search, out);
        }
    }
}

impl SpaceFillingCurve for HilbertCurve {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn levels(&self) -> u32 {
        self.levels
    }

    fn ordinate(&self, coords: &[f64]) -> Result<u64, SpatialError> {
        let dimension = self.dimension();
        if coords.len() != dimension {
            return Err(SpatialError::InvalidCurve(format!(
                "curve has {dimension} dimensions, got {} coordinates",
                coords.len()
            )));
        }
        let mut axes = [0u64; MAX_DIMENSION];
        for (axis, &value) in coords.iter().enumerate() {
            axes[axis] = self.normalize(axis, value);
        }
        let axes = &mut axes[..dimension];
        axes_to_transpose(axes, self.levels);
        Ok(interleave(axes, self.levels))
    }

    fn prefix_envelope(&self, prefix: u64, depth: u32) -> Envelope {
        let dimension = self.dimension();
        if depth == 0 {
            return self.envelope;
        }
        let depth = depth.min(self.levels);
        let axes = self.cell_axes(prefix, depth);

        let cells = (1u64 << depth) as f64;
        let mut min = [0.0; MAX_DIMENSION];
        let mut max = [0.0; MAX_DIMENSION];
        for axis in 0..dimension {
            let width = self.envelope.width(axis) / cells;
            min[axis] = self.envelope.min()[axis] + axes[axis] as f64 * width;
            max[axis] = min[axis] + width;
        }
        Envelope::from_arrays(dimension, min, max)
    }

    fn ranges_intersecting(&self, search: &Envelope, max_depth: u32) -> Vec<RangeInclusive<u64>> {
        let mut ranges = Vec::new();
        self.collect(0, 0, max_depth.min(self.levels), search, &mut ranges);
        ranges
    }
}

/// Hilbert transform of axis values into the transposed index form.
fn axes_to_transpose(x: &mut [u64], bits: u32) {
    let n = x.len();
    let m = 1u64 << (bits - 1);

    // Inverse undo
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..n {
            if x[i] & q == 0 {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            } else {
                x[0] ^= p;
            }
        }
        q >>= 1;
    }

    // Gray encode
    for i in 1..n {
        x[i] ^= x[i - 1];
    }
    let mut t = 0;
    let mut q = m;
    while q > 1 {
        if x[n - 1] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for value in x.iter_mut() {
        *value ^= t;
    }
}

/// Inverse of `axes_to_transpose`.
fn transpose_to_axes(x: &mut [u64], bits: u32) {
    let n = x.len();
    let limit = 2u64 << (bits - 1);

    // Gray decode
    let t = x[n - 1] >> 1;
    for i in (1..n).rev() {
        x[i] ^= x[i - 1];
    }
    x[0] ^= t;

    // Undo excess work
    let mut q = 2;
    while q != limit {
        let p = q - 1;
        for i in (0..n).rev() {
            if x[i] & q == 0 {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            } else {
                x[0] ^= p;
            }
        }
        q <<= 1;
    }
}

/// Pack the transposed form into one integer, most significant level first.
fn interleave(x: &[u64], bits: u32) -> u64 {
    let mut index = 0u64;
    for bit in (0..bits).rev() {
        for value in x {
            index = (index << 1) | ((value >> bit) & 1);
        }
    }
    index
}

fn deinterleave(index: u64, bits: u32, x: &mut [u64]) {
    let n = x.len() as u32;
    for bit in 0..bits {
        for (i, value) in x.iter_mut().enumerate() {
            let position = bit * n + (n - 1 - i as u32);
            *value |= ((index >> position) & 1) << bit;
        }
    }
}

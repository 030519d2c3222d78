//! Key layout for points.
//!
//! ```text
//! [curve ordinate: u64][coordinate: sortable f64] x dimension [entity id: u64]
//! ```
//!
//! The ordinate is the primary sort key. Coordinates follow it so that
//! distinct points sharing a curve cell still order deterministically and
//! decode exactly.

use std::ops::RangeInclusive;

use super::error::LayoutError;
use super::identifier::LayoutIdentifier;
use super::{
    ENTITY_ID_SIZE, IndexKey, KeyLayout, LAYOUT_MAJOR, LAYOUT_MINOR, check_key_len, f64_to_sortable,
    fingerprint, read_u64_be, sortable_to_f64, write_u64_be,
};
use crate::spatial::{
    CoordinateReferenceSystem, Envelope, HilbertCurve, MAX_DIMENSION, PointValue,
    SpaceFillingCurve, SpatialError,
};

pub(super) const FAMILY: &str = "spatial";

const ORDINATE_SIZE: usize = 8;
const COORDINATE_SIZE: usize = 8;

/// Layout for `PointValue` keys of one reference system (`UPI` unique,
/// `NUPI` non-unique).
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialLayout {
    identifier: LayoutIdentifier,
    crs: CoordinateReferenceSystem,
    curve: HilbertCurve,
    unique: bool,
}

impl SpatialLayout {
    /// Key width for points of `dimension` coordinates.
    #[must_use]
    pub const fn key_size_for(dimension: usize) -> usize {
        ORDINATE_SIZE + COORDINATE_SIZE * dimension + ENTITY_ID_SIZE
    }

    pub fn new(
        crs: CoordinateReferenceSystem,
        curve: HilbertCurve,
        unique: bool,
    ) -> Result<Self, LayoutError> {
        if curve.dimension() != crs.dimension() {
            return Err(SpatialError::InvalidCurve(format!(
                "{crs} needs a {}-dimensional curve, got {}",
                crs.dimension(),
                curve.dimension()
            ))
            .into());
        }
        let tag = if unique { "UPI" } else { "NUPI" };
        Ok(Self {
            identifier: LayoutIdentifier::new(
                tag,
                Self::key_size_for(crs.dimension()),
                LAYOUT_MAJOR,
                LAYOUT_MINOR,
            )?,
            crs,
            curve,
            unique,
        })
    }

    #[must_use]
    pub const fn crs(&self) -> CoordinateReferenceSystem {
        self.crs
    }

    #[must_use]
    pub const fn curve(&self) -> &HilbertCurve {
        &self.curve
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// Curve ordinate of an encoded key.
    pub fn key_ordinate(&self, key: &[u8]) -> Result<u64, LayoutError> {
        check_key_len(self.key_size(), key)?;
        Ok(read_u64_be(key, 0))
    }

    /// Smallest possible key with `ordinate`: the search target for the first
    /// key of an ordinate range.
    #[must_use]
    pub fn first_key_at_ordinate(&self, ordinate: u64) -> Vec<u8> {
        let mut key = vec![0u8; self.key_size()];
        write_u64_be(&mut key, 0, ordinate);
        key
    }

    /// Ordinate ranges whose keys may hold points inside `search`.
    ///
    /// Ranges cover whole curve cells, so matching keys are candidates and
    /// must be post-filtered against their decoded coordinates.
    pub fn candidate_ranges(
        &self,
        search: &Envelope,
        max_depth: u32,
    ) -> Result<Vec<RangeInclusive<u64>>, LayoutError> {
        if search.dimension() != self.crs.dimension() {
            return Err(SpatialError::DimensionMismatch {
                crs: self.crs,
                expected: self.crs.dimension(),
                actual: search.dimension(),
            }
            .into());
        }
        Ok(self.curve.ranges_intersecting(search, max_depth))
    }
}

impl KeyLayout for SpatialLayout {
    type Value = PointValue;

    fn identifier(&self) -> LayoutIdentifier {
        self.identifier
    }

    fn is_unique(&self) -> bool {
        self.unique
    }

    fn settings_fingerprint(&self) -> u32 {
        let envelope = self.curve.envelope();
        let mut settings = Vec::with_capacity(8 + 16 * MAX_DIMENSION);
        settings.extend_from_slice(&self.crs.code().to_le_bytes());
        settings.extend_from_slice(&self.curve.levels().to_le_bytes());
        for (min, max) in envelope.min().iter().zip(envelope.max()) {
            settings.extend_from_slice(&min.to_bits().to_le_bytes());
            settings.extend_from_slice(&max.to_bits().to_le_bytes());
        }
        fingerprint(FAMILY, &settings)
    }

    fn sort_prefix_len(&self) -> usize {
        ORDINATE_SIZE + COORDINATE_SIZE * self.crs.dimension()
    }

    fn encode_parts(
        &self,
        value: &PointValue,
        entity_id: u64,
        out: &mut [u8],
    ) -> Result<(), LayoutError> {
        check_key_len(self.key_size(), out)?;
        if value.crs() != self.crs {
            return Err(SpatialError::CrsMismatch {
                expected: self.crs,
                found: value.crs(),
            }
            .into());
        }
        write_u64_be(out, 0, value.curve_ordinate(&self.curve)?);
        for (axis, &coordinate) in value.coordinates().iter().enumerate() {
            write_u64_be(
                out,
                ORDINATE_SIZE + COORDINATE_SIZE * axis,
                f64_to_sortable(coordinate),
            );
        }
        write_u64_be(out, self.sort_prefix_len(), entity_id);
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<IndexKey<PointValue>, LayoutError> {
        check_key_len(self.key_size(), bytes)?;
        let dimension = self.crs.dimension();
        let mut coords = [0.0; MAX_DIMENSION];
        for (axis, coordinate) in coords.iter_mut().take(dimension).enumerate() {
            let at = ORDINATE_SIZE + COORDINATE_SIZE * axis;
            *coordinate = sortable_to_f64(read_u64_be(bytes, at));
        }
        let point = PointValue::new(self.crs, &coords[..dimension])?;
        Ok(IndexKey::new(point, read_u64_be(bytes, self.sort_prefix_len())))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn wgs84(unique: bool) -> SpatialLayout {
        let crs = CoordinateReferenceSystem::Wgs84;
        let curve = HilbertCurve::new(crs.default_curve_envelope(), 30).expect("curve");
        SpatialLayout::new(crs, curve, unique).expect("layout")
    }

    fn encode(layout: &SpatialLayout, point: PointValue, entity: u64) -> Vec<u8> {
        let mut out = vec![0u8; layout.key_size()];
        layout
            .encode(&IndexKey::new(point, entity), &mut out)
            .expect("encode");
        out
    }

    #[test]
    fn test_identifier_and_sizes() {
        let layout = wgs84(false);
        assert_eq!(layout.identifier().word(), 0x4E55_5049_0020_0001);
        assert_eq!(wgs84(true).identifier().tag(), "UPI");

        let crs = CoordinateReferenceSystem::Cartesian3D;
        let curve = HilbertCurve::new(crs.default_curve_envelope(), 20).expect("curve");
        let layout = SpatialLayout::new(crs, curve, false).expect("layout");
        assert_eq!(layout.key_size(), 40);
    }

    #[test]
    fn test_curve_dimension_must_match() {
        let curve = HilbertCurve::new(
            CoordinateReferenceSystem::Cartesian3D.default_curve_envelope(),
            20,
        )
        .expect("curve");
        assert!(SpatialLayout::new(CoordinateReferenceSystem::Cartesian, curve, true).is_err());
    }

    #[test]
    fn test_roundtrip_and_order() {
        let layout = wgs84(false);
        let mut rng = StdRng::seed_from_u64(21);
        let mut keys = Vec::new();
        for entity in 0..300 {
            let point = PointValue::new(
                CoordinateReferenceSystem::Wgs84,
                &[rng.random_range(-180.0..=180.0), rng.random_range(-90.0..=90.0)],
            )
            .expect("point");
            let key = encode(&layout, point, entity);
            let decoded = layout.decode(&key).expect("decode");
            assert_eq!(decoded, IndexKey::new(point, entity));
            keys.push((point, key));
        }
        for (a, ka) in &keys {
            for (b, kb) in keys.iter().take(30) {
                let expected = a.compare_on_curve(b, layout.curve()).expect("same crs");
                let actual = layout.compare(ka, kb);
                if expected.is_ne() {
                    assert_eq!(actual, expected);
                }
            }
        }
    }

    #[test]
    fn test_duplicate_points_ordered_by_entity_when_non_unique() {
        let point =
            PointValue::new(CoordinateReferenceSystem::Wgs84, &[10.0, 20.0]).expect("point");
        let layout = wgs84(false);
        assert_eq!(
            layout.compare(&encode(&layout, point, 1), &encode(&layout, point, 2)),
            Ordering::Less
        );
        let unique = wgs84(true);
        assert_eq!(
            unique.compare(&encode(&unique, point, 1), &encode(&unique, point, 2)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_rejects_other_reference_system() {
        let layout = wgs84(true);
        let point =
            PointValue::new(CoordinateReferenceSystem::Cartesian, &[1.0, 2.0]).expect("point");
        let mut out = vec![0u8; layout.key_size()];
        assert!(matches!(
            layout.encode(&IndexKey::new(point, 1), &mut out),
            Err(LayoutError::Spatial(SpatialError::CrsMismatch { .. }))
        ));
    }

    #[test]
    fn test_points_beyond_curve_envelope_are_candidates() {
        for (crs, coords, min, max) in [
            (
                CoordinateReferenceSystem::Cartesian,
                vec![2_000_000.0, 0.0],
                vec![1_500_000.0, -1.0],
                vec![2_500_000.0, 1.0],
            ),
            (
                CoordinateReferenceSystem::Wgs84_3D,
                vec![12.5, 41.9, 5_000_000.0],
                vec![12.0, 41.0, 4_000_000.0],
                vec![13.0, 42.0, 6_000_000.0],
            ),
        ] {
            let curve = HilbertCurve::new(crs.default_curve_envelope(), 16).expect("curve");
            let layout = SpatialLayout::new(crs, curve, false).expect("layout");
            let point = PointValue::new(crs, &coords).expect("point");
            let key = encode(&layout, point, 7);
            let ordinate = layout.key_ordinate(&key).expect("key size");

            let search = Envelope::new(&min, &max).expect("envelope");
            let ranges = layout.candidate_ranges(&search, 16).expect("same dimension");
            assert!(
                ranges.iter().any(|range| range.contains(&ordinate)),
                "{crs} point {coords:?} missed"
            );
            assert_eq!(layout.decode(&key).expect("decode").value, point);
        }
    }

    #[test]
    fn test_fingerprint_tracks_curve_settings() {
        let crs = CoordinateReferenceSystem::Cartesian;
        let layout = |levels| {
            let curve = HilbertCurve::new(crs.default_curve_envelope(), levels).expect("curve");
            SpatialLayout::new(crs, curve, false).expect("layout")
        };
        assert_eq!(layout(30).settings_fingerprint(), layout(30).settings_fingerprint());
        assert_ne!(layout(30).settings_fingerprint(), layout(28).settings_fingerprint());
        assert_ne!(layout(30).settings_fingerprint(), wgs84(false).settings_fingerprint());
        assert_eq!(layout(30).identifier(), wgs84(false).identifier());
    }
}

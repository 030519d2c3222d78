//! Test envelope searches over spatial keys: curve ranges, then post-filter.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::e2e_tests::helpers::*;
use crate::layout::{IndexValue, KeyLayout, LayoutKey};
use crate::spatial::{CoordinateReferenceSystem, Envelope, PointValue};

/// Entity ids of keys inside `search`, found through curve ranges.
fn search_tree(tree: &TestTree, search: &Envelope, max_depth: u32) -> (BTreeSet<u64>, usize) {
    let layout = tree.layout.as_spatial().expect("spatial layout");
    let ranges = layout
        .candidate_ranges(search, max_depth)
        .expect("matching dimension");

    let mut matches = BTreeSet::new();
    let mut candidates = 0;
    for range in ranges {
        let mut index = match tree.find_bytes(&layout.first_key_at_ordinate(*range.start())) {
            Ok(index) | Err(index) => index,
        };
        while index < tree.len() {
            let key = tree.key_bytes(index);
            if layout.key_ordinate(key).expect("key size") > *range.end() {
                break;
            }
            candidates += 1;
            let entry = layout.decode(key).expect("decode");
            if search.contains(entry.value.coordinates()) {
                matches.insert(entry.entity_id);
            }
            index += 1;
        }
    }
    (matches, candidates)
}

#[test]
fn test_envelope_search_matches_brute_force() {
    let crs = CoordinateReferenceSystem::Wgs84;
    let mut tree = TestTree::create(LayoutKey::Spatial { crs, unique: false });
    let mut rng = StdRng::seed_from_u64(77);
    let mut points: Vec<(PointValue, u64)> = Vec::new();

    for entity in 0..2_000u64 {
        let p = point(
            crs,
            &[rng.random_range(-180.0..180.0), rng.random_range(-90.0..90.0)],
        );
        tree.insert(IndexValue::Point(p), entity);
        points.push((p, entity));
    }

    for (min, max) in [
        ([-10.0, 40.0], [30.0, 60.0]),
        ([100.0, -45.0], [101.5, -44.0]),
        ([-180.0, -90.0], [180.0, 90.0]),
        ([170.0, 80.0], [179.9, 89.9]),
    ] {
        let search = Envelope::new(&min, &max).expect("envelope");
        let expected: BTreeSet<u64> = points
            .iter()
            .filter(|(p, _)| search.contains(p.coordinates()))
            .map(|(_, entity)| *entity)
            .collect();
        let (found, candidates) = search_tree(&tree, &search, 8);
        assert_eq!(found, expected, "search {min:?}..{max:?}");
        assert!(candidates >= found.len());
    }
}

#[test]
fn test_candidates_shrink_with_deeper_ranges() {
    let crs = CoordinateReferenceSystem::Cartesian;
    let mut tree = TestTree::create(LayoutKey::Spatial { crs, unique: true });
    let mut rng = StdRng::seed_from_u64(78);
    for entity in 0..1_000u64 {
        let p = point(
            crs,
            &[rng.random_range(-1000.0..1000.0), rng.random_range(-1000.0..1000.0)],
        );
        tree.insert(IndexValue::Point(p), entity);
    }

    let search = Envelope::new(&[-100.0, -100.0], &[100.0, 100.0]).expect("envelope");
    let (coarse, coarse_candidates) = search_tree(&tree, &search, 12);
    let (fine, fine_candidates) = search_tree(&tree, &search, 20);
    assert_eq!(coarse, fine);
    assert!(fine_candidates <= coarse_candidates);
}

#[test]
fn test_exact_point_lookup() {
    let crs = CoordinateReferenceSystem::Wgs84_3D;
    let mut tree = TestTree::create(LayoutKey::Spatial { crs, unique: true });
    let berlin = point(crs, &[13.4, 52.52, 34.0]);
    let everest = point(crs, &[86.925, 27.9881, 8848.86]);
    let deep = point(crs, &[142.2, 11.35, -10_994.0]);
    for (entity, p) in [berlin, everest, deep].into_iter().enumerate() {
        tree.insert(IndexValue::Point(p), entity as u64);
    }

    let index = tree
        .find(IndexValue::Point(everest), 0)
        .expect("everest is stored");
    let entries = tree.entries();
    assert_eq!(entries[index].value, IndexValue::Point(everest));
    assert_eq!(entries[index].entity_id, 1);

    assert!(tree.find(IndexValue::Point(point(crs, &[13.4, 52.52, 35.0])), 0).is_err());
}

#[test]
fn test_search_finds_points_beyond_curve_envelope() {
    let crs = CoordinateReferenceSystem::Cartesian;
    let mut tree = TestTree::create(LayoutKey::Spatial { crs, unique: false });
    let stored = [
        ([2_000_000.0, 0.0], 1),
        ([2_000_000.0, 5.0], 2),
        ([-3e7, -3e7], 3),
        ([999_999.0, 0.5], 4),
        ([0.0, 0.0], 5),
    ];
    for (coords, entity) in stored {
        tree.insert(IndexValue::Point(point(crs, &coords)), entity);
    }

    let east = Envelope::new(&[1_500_000.0, -1.0], &[2_500_000.0, 1.0]).expect("envelope");
    assert_eq!(search_tree(&tree, &east, 16).0, BTreeSet::from([1]));

    let south_west = Envelope::new(&[-4e7, -4e7], &[-2e7, -2e7]).expect("envelope");
    assert_eq!(search_tree(&tree, &south_west, 16).0, BTreeSet::from([3]));
}

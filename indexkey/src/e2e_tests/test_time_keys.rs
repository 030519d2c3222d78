//! Test ordering and lookup of time keys written with mixed offsets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::e2e_tests::helpers::*;
use crate::layout::{IndexValue, LayoutKey};
use crate::temporal::{TimeValue, ZoneOffset};

#[test]
fn test_keys_sorted_by_instant_across_offsets() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: false });
    let texts = [
        "23:59:59.999999999Z",
        "00:30+01:00",
        "12:00-05:00",
        "T0800",
        "09:15:30.5+01:30",
        "17:00:00,25Z",
    ];
    for (entity, text) in texts.iter().enumerate() {
        tree.insert(IndexValue::Time(time(text)), entity as u64);
    }

    let entries = tree.entries();
    assert_eq!(entries.len(), texts.len());
    let instants: Vec<u64> = entries
        .iter()
        .map(|entry| match &entry.value {
            IndexValue::Time(t) => t.utc_nanos_of_day(),
            other => panic!("expected a time, got {other:?}"),
        })
        .collect();
    assert!(instants.is_sorted());

    // 00:30+01:00 is 23:30Z, so it sorts just before 23:59:59.999999999Z.
    let last_two: Vec<u64> = entries[entries.len() - 2..].iter().map(|e| e.entity_id).collect();
    assert_eq!(last_two, vec![1, 0]);
}

#[test]
fn test_decoded_keys_keep_written_offset() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: true });
    tree.insert(IndexValue::Time(time("14:30+01:00")), 7);

    let entries = tree.entries();
    let IndexValue::Time(stored) = &entries[0].value else {
        panic!("expected a time");
    };
    assert_eq!(stored.to_string(), "14:30+01:00");
    assert_eq!(entries[0].entity_id, 7);
}

#[test]
fn test_unique_lookup_ignores_offset_and_entity() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: true });
    for (entity, text) in ["10:00Z", "11:00Z", "12:00Z"].iter().enumerate() {
        tree.insert(IndexValue::Time(time(text)), entity as u64);
    }

    // 13:00+02:00 is the same instant as 11:00Z.
    assert_eq!(tree.find(IndexValue::Time(time("13:00+02:00")), 999), Ok(1));
    assert_eq!(tree.find(IndexValue::Time(time("11:30Z")), 0), Err(2));
}

#[test]
fn test_non_unique_duplicates_ordered_by_entity() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: false });
    let same_instant = ["15:00+02:00", "13:00Z", "08:00-05:00"];
    for (entity, text) in same_instant.iter().enumerate().rev() {
        tree.insert(IndexValue::Time(time(text)), entity as u64);
    }

    let entities: Vec<u64> = tree.entries().iter().map(|e| e.entity_id).collect();
    assert_eq!(entities, vec![0, 1, 2]);
    assert_eq!(tree.find(IndexValue::Time(time("13:00Z")), 1), Ok(1));
    assert_eq!(tree.find(IndexValue::Time(time("13:00Z")), 5), Err(3));
}

#[test]
fn test_many_random_times_match_value_order() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: false });
    let mut values = Vec::new();

    for entity in 0..500u64 {
        let offset = ZoneOffset::from_seconds(rng.random_range(-64_800..=64_800)).expect("offset");
        let value = TimeValue::of(
            rng.random_range(0..24),
            rng.random_range(0..60),
            rng.random_range(0..60),
            rng.random_range(0..1_000_000_000),
            offset,
        )
        .expect("valid time");
        tree.insert(IndexValue::Time(value), entity);
        values.push((value, entity));
    }

    values.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    let stored: Vec<u64> = tree.entries().iter().map(|e| e.entity_id).collect();
    let expected: Vec<u64> = values.iter().map(|(_, entity)| *entity).collect();
    assert_eq!(stored, expected);
}

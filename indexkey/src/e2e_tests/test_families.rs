//! Test dispatch by value type across every layout family.

use crate::e2e_tests::helpers::*;
use crate::layout::{IndexKey, IndexValue, KeyLayout, LayoutError, LayoutKey, MAX_TEXT_BYTES};
use crate::spatial::{CoordinateReferenceSystem, SpatialError};

#[test]
fn test_each_value_routes_to_its_layout() {
    let tree = TestTree::create(LayoutKey::Number { unique: true });
    let values = [
        IndexValue::Time(time("08:00Z")),
        IndexValue::Point(point(CoordinateReferenceSystem::Cartesian, &[3.0, 4.0])),
        IndexValue::Number(-2.5),
        IndexValue::Text("hello".to_string()),
    ];
    let expected_tags = ["NUTI", "NUPI", "NUNI", "NUSI"];

    for (value, tag) in values.iter().zip(expected_tags) {
        let layout = tree
            .registry
            .for_value(value, false)
            .expect("every family is registered");
        assert_eq!(layout.identifier().tag(), tag);

        let mut key = vec![0u8; layout.key_size()];
        layout
            .encode(&IndexKey::new(value.clone(), 42), &mut key)
            .expect("encode");
        let decoded = layout.decode(&key).expect("decode");
        assert_eq!(decoded, IndexKey::new(value.clone(), 42));
    }
}

#[test]
fn test_wrong_family_rejected() {
    let tree = TestTree::create(LayoutKey::Text { unique: false });
    let mut key = vec![0u8; tree.layout.key_size()];
    let result = tree
        .layout
        .encode(&IndexKey::new(IndexValue::Number(1.0), 1), &mut key);
    assert_eq!(
        result,
        Err(LayoutError::WrongFamily {
            expected: "text",
            found: "number",
        })
    );
}

#[test]
fn test_point_of_other_system_rejected() {
    let tree = TestTree::create(LayoutKey::Spatial {
        crs: CoordinateReferenceSystem::Wgs84,
        unique: false,
    });
    let cartesian = point(CoordinateReferenceSystem::Cartesian, &[1.0, 1.0]);
    let mut key = vec![0u8; tree.layout.key_size()];
    assert!(matches!(
        tree.layout
            .encode(&IndexKey::new(IndexValue::Point(cartesian), 1), &mut key),
        Err(LayoutError::Spatial(SpatialError::CrsMismatch { .. }))
    ));
}

#[test]
fn test_numbers_and_text_sorted_in_page() {
    let mut numbers = TestTree::create(LayoutKey::Number { unique: false });
    for (entity, value) in [3.0, -1.0, f64::INFINITY, 0.0, -0.0, 2.5].into_iter().enumerate() {
        numbers.insert(IndexValue::Number(value), entity as u64);
    }
    let stored: Vec<(IndexValue, u64)> = numbers
        .entries()
        .into_iter()
        .map(|e| (e.value, e.entity_id))
        .collect();
    assert_eq!(
        stored,
        vec![
            (IndexValue::Number(-1.0), 1),
            (IndexValue::Number(0.0), 3),
            (IndexValue::Number(0.0), 4),
            (IndexValue::Number(2.5), 5),
            (IndexValue::Number(3.0), 0),
            (IndexValue::Number(f64::INFINITY), 2),
        ]
    );

    let mut text = TestTree::create(LayoutKey::Text { unique: true });
    for (entity, word) in ["pear", "apple", "fig", "apples"].iter().enumerate() {
        text.insert(IndexValue::Text((*word).to_string()), entity as u64);
    }
    let words: Vec<IndexValue> = text.entries().into_iter().map(|e| e.value).collect();
    assert_eq!(
        words,
        ["apple", "apples", "fig", "pear"]
            .iter()
            .map(|w| IndexValue::Text((*w).to_string()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_oversized_text_rejected() {
    let tree = TestTree::create(LayoutKey::Text { unique: true });
    let mut key = vec![0u8; tree.layout.key_size()];
    let long = "é".repeat(MAX_TEXT_BYTES / 2 + 1);
    assert!(matches!(
        tree.layout
            .encode(&IndexKey::new(IndexValue::Text(long), 1), &mut key),
        Err(LayoutError::ValueTooLarge { .. })
    ));
}

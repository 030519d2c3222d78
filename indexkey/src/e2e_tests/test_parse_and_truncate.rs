//! Test that parsed, truncated and built times land on the expected keys.

use std::cmp::Ordering;

use crate::e2e_tests::helpers::*;
use crate::layout::{IndexKey, IndexValue, KeyLayout, LayoutKey};
use crate::temporal::{
    Duration, Temporal, TimeBuilder, TimeFields, TimeUnit, TimeValue, Zone, ZoneOffset,
};
use crate::time::FixedTimeSource;

fn encode(tree: &TestTree, value: TimeValue, entity_id: u64) -> Vec<u8> {
    let mut key = vec![0u8; tree.layout.key_size()];
    tree.layout
        .encode(&IndexKey::new(IndexValue::Time(value), entity_id), &mut key)
        .expect("encode");
    key
}

#[test]
fn test_equal_instants_encode_to_equal_sort_keys() {
    let tree = TestTree::create(LayoutKey::Temporal { unique: true });
    let a = time("14:30+01:00");
    let b = time("13:30Z");
    assert_eq!(a, b);
    assert_eq!(
        tree.layout.compare(&encode(&tree, a, 1), &encode(&tree, b, 2)),
        Ordering::Equal
    );
}

#[test]
fn test_truncate_then_index() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: false });
    let source = Temporal::Time(time("16:47:22.123+02:00"));

    let minute = TimeValue::truncate(
        TimeUnit::Minute,
        &source,
        &TimeFields::new(),
        &Zone::UTC,
        &clock(),
    )
    .expect("truncate");
    assert_eq!(minute.to_string(), "16:47+02:00");

    let rezoned = TimeValue::truncate(
        TimeUnit::Minute,
        &source,
        &TimeFields::new().timezone(Zone::UTC),
        &Zone::UTC,
        &clock(),
    )
    .expect("truncate");
    assert_eq!((rezoned.hour(), rezoned.minute()), (16, 47));
    assert!(rezoned.offset().is_utc());

    tree.insert(IndexValue::Time(minute), 1);
    tree.insert(IndexValue::Time(rezoned), 2);
    // Same wall clock, new offset: the instant moved two hours later.
    let entities: Vec<u64> = tree.entries().iter().map(|e| e.entity_id).collect();
    assert_eq!(entities, vec![1, 2]);
    assert_eq!(
        rezoned.utc_nanos_of_day() - minute.utc_nanos_of_day(),
        2 * 3600 * 1_000_000_000
    );
}

#[test]
fn test_default_zone_resolved_at_parse_time() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: true });
    let plus_three = Zone::Fixed(ZoneOffset::from_hours_minutes(3, 0).expect("offset"));
    let local = TimeValue::parse("12:00", &plus_three, &clock()).expect("parse");
    tree.insert(IndexValue::Time(local), 1);

    assert_eq!(tree.find(IndexValue::Time(time("09:00Z")), 0), Ok(0));
    let resolver = || Zone::UTC;
    let utc = TimeValue::parse("12:00", &resolver, &clock()).expect("parse");
    assert_eq!(tree.find(IndexValue::Time(utc), 0), Err(1));
}

#[test]
fn test_builder_output_and_arithmetic() {
    let tree = TestTree::create(LayoutKey::Temporal { unique: true });
    let base = time("23:30-01:00");

    let built = TimeBuilder::new()
        .select(Temporal::Time(base))
        .with_fields(TimeFields::new().minute(0).timezone(Zone::UTC))
        .build(&Zone::UTC, &clock())
        .expect("build");
    assert_eq!(built.to_string(), "00:00Z");

    let ninety_minutes = Duration::of_seconds(90 * 60);
    let later = base.add(&ninety_minutes);
    assert_eq!(later.to_string(), "01:00-01:00");
    assert_eq!(later.sub(&ninety_minutes), base);
    assert_eq!(
        tree.layout
            .compare(&encode(&tree, base, 0), &encode(&tree, later, 0)),
        Ordering::Less
    );
}

#[test]
fn test_now_with_pinned_clock() {
    // 1_700_000_000_000 ms is 22:13:20Z.
    let now = TimeValue::now(&clock(), &Zone::UTC).expect("now");
    assert_eq!(now, time("22:13:20Z"));

    let midnight = TimeValue::now(&FixedTimeSource(0), &Zone::UTC).expect("now");
    assert_eq!(midnight.utc_nanos_of_day(), 0);
}

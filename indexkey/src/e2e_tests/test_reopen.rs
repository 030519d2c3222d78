//! Test opening trees whose metadata was written by another configuration.

use crate::config::IndexConfig;
use crate::e2e_tests::helpers::*;
use crate::layout::{
    Compatibility, IndexValue, KeyLayout, LayoutError, LayoutIdentifier, LayoutKey, MetaError,
    PageRegion, TreeMeta,
};
use crate::registry::LayoutRegistry;
use crate::spatial::CoordinateReferenceSystem;

#[test]
fn test_reopen_with_same_configuration() {
    let mut tree = TestTree::create(LayoutKey::Temporal { unique: false });
    tree.insert(IndexValue::Time(time("10:00Z")), 1);

    let meta = TreeMeta::read_from(tree.page(), 0).expect("metadata");
    let registry = LayoutRegistry::new(&IndexConfig::default()).expect("registry");
    let (layout, compatibility) = registry.open(&meta).expect("same layout");
    assert_eq!(compatibility, Compatibility::Exact);
    assert_eq!(layout.key(), LayoutKey::Temporal { unique: false });

    let entry = layout.decode(tree.key_bytes(0)).expect("decode with reopened layout");
    assert_eq!(entry.value, IndexValue::Time(time("10:00Z")));
}

#[test]
fn test_changed_curve_levels_refuse_open() {
    let crs = CoordinateReferenceSystem::Cartesian;
    let tree = TestTree::create(LayoutKey::Spatial { crs, unique: false });
    let meta = TreeMeta::read_from(tree.page(), 0).expect("metadata");

    let changed = IndexConfig {
        curve_levels_2d: 24,
        ..IndexConfig::default()
    };
    let registry = LayoutRegistry::new(&changed).expect("registry");
    assert!(matches!(
        registry.open(&meta),
        Err(MetaError::Layout(LayoutError::FormatMismatch { .. }))
    ));

    // The same identifier with the old settings still validates against the
    // tree's own layout.
    assert_eq!(
        meta.validate(tree.layout.as_ref()).expect("own layout"),
        Compatibility::Exact
    );
}

#[test]
fn test_changed_cartesian_bounds_refuse_open() {
    let crs = CoordinateReferenceSystem::Cartesian3D;
    let tree = TestTree::create(LayoutKey::Spatial { crs, unique: true });
    let meta = TreeMeta::read_from(tree.page(), 0).expect("metadata");

    let changed = IndexConfig {
        cartesian_min: -500.0,
        cartesian_max: 500.0,
        ..IndexConfig::default()
    };
    let registry = LayoutRegistry::new(&changed).expect("registry");
    assert!(registry.open(&meta).is_err());

    // Geographic layouts do not depend on Cartesian bounds.
    let wgs = TestTree::create(LayoutKey::Spatial {
        crs: CoordinateReferenceSystem::Wgs84,
        unique: true,
    });
    let wgs_meta = TreeMeta::read_from(wgs.page(), 0).expect("metadata");
    let (layout, _) = registry.open(&wgs_meta).expect("unchanged settings");
    assert_eq!(
        layout.key(),
        LayoutKey::Spatial {
            crs: CoordinateReferenceSystem::Wgs84,
            unique: true
        }
    );
}

#[test]
fn test_unique_tree_never_opens_as_non_unique() {
    let tree = TestTree::create(LayoutKey::Text { unique: true });
    let meta = TreeMeta::read_from(tree.page(), 0).expect("metadata");
    let non_unique = tree
        .registry
        .get(LayoutKey::Text { unique: false })
        .expect("layout");

    assert!(matches!(
        meta.validate(non_unique.as_ref()),
        Err(MetaError::Layout(LayoutError::FormatMismatch { .. }))
    ));
}

#[test]
fn test_older_minor_version_is_reported() {
    let tree = TestTree::create(LayoutKey::Number { unique: false });
    let mut page = tree.page().to_vec();
    let current = TreeMeta::read_from(&page, 0).expect("metadata");
    let older = TreeMeta {
        identifier: LayoutIdentifier::new("NUNI", 16, 0, 0).expect("identifier"),
        ..current
    };
    older.write_to(&mut page, 0).expect("rewrite metadata");

    let reread = TreeMeta::read_from(&page, 0).expect("metadata");
    let (layout, compatibility) = tree.registry.open(&reread).expect("minor mismatch opens");
    assert_eq!(layout.key(), LayoutKey::Number { unique: false });
    assert_eq!(
        compatibility,
        Compatibility::MinorMismatch {
            expected: 1,
            found: 0
        }
    );
}

#[test]
fn test_corrupted_metadata_detected() {
    let tree = TestTree::create(LayoutKey::Temporal { unique: true });
    let mut page = tree.page().to_vec();
    let word = page.read_u64(4).expect("in bounds");
    page.write_u64(4, word ^ 0x0000_0000_0001_0000).expect("in bounds");
    assert!(matches!(
        TreeMeta::read_from(&page, 0),
        Err(MetaError::ChecksumMismatch { .. })
    ));
}

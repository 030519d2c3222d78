//! Common helpers for end-to-end tests.

use std::sync::Arc;

use crate::config::IndexConfig;
use crate::layout::search;
use crate::layout::{AnyLayout, IndexKey, IndexValue, KeyLayout, LayoutKey, TreeMeta};
use crate::registry::LayoutRegistry;
use crate::spatial::{CoordinateReferenceSystem, PointValue};
use crate::temporal::{TimeValue, Zone};
use crate::time::FixedTimeSource;

/// Size of the page each test tree lives in.
pub const PAGE_SIZE: usize = 64 * 1024;

/// Keys start right after the metadata record.
const KEYS_OFFSET: usize = TreeMeta::SIZE;

/// A single-page "tree": metadata followed by sorted fixed-size keys.
pub struct TestTree {
    pub registry: LayoutRegistry,
    pub layout: Arc<AnyLayout>,
    page: Vec<u8>,
    count: usize,
}

impl TestTree {
    /// Create an empty tree for `key` with the default configuration.
    #[must_use]
    pub fn create(key: LayoutKey) -> Self {
        Self::create_with(&IndexConfig::default(), key)
    }

    #[must_use]
    pub fn create_with(config: &IndexConfig, key: LayoutKey) -> Self {
        let registry = LayoutRegistry::new(config).expect("registry should build");
        let layout = registry.get(key).expect("layout should be registered");
        let mut page = vec![0u8; PAGE_SIZE];
        TreeMeta::for_layout(layout.as_ref())
            .write_to(&mut page, 0)
            .expect("metadata should fit");
        Self {
            registry,
            layout,
            page,
            count: 0,
        }
    }

    /// Encode and insert a key, returning its position.
    pub fn insert(&mut self, value: IndexValue, entity_id: u64) -> usize {
        let mut key = vec![0u8; self.layout.key_size()];
        self.layout
            .encode(&IndexKey::new(value, entity_id), &mut key)
            .expect("value should encode");
        let position = search::insert_key(
            self.layout.as_ref(),
            &mut self.page,
            KEYS_OFFSET,
            self.count,
            &key,
        )
        .expect("page should have room");
        self.count += 1;
        position
    }

    /// Search for `value` with `entity_id` as the target's entity.
    pub fn find(&self, value: IndexValue, entity_id: u64) -> Result<usize, usize> {
        let mut target = vec![0u8; self.layout.key_size()];
        self.layout
            .encode(&IndexKey::new(value, entity_id), &mut target)
            .expect("target should encode");
        self.find_bytes(&target)
    }

    pub fn find_bytes(&self, target: &[u8]) -> Result<usize, usize> {
        search::find_key(self.layout.as_ref(), &self.page, KEYS_OFFSET, self.count, target)
            .expect("keys should be in bounds")
    }

    /// Raw bytes of the key at `index`.
    #[must_use]
    pub fn key_bytes(&self, index: usize) -> &[u8] {
        let size = self.layout.key_size();
        &self.page[KEYS_OFFSET + index * size..KEYS_OFFSET + (index + 1) * size]
    }

    /// Decode every key in order.
    #[must_use]
    pub fn entries(&self) -> Vec<IndexKey<IndexValue>> {
        (0..self.count)
            .map(|i| self.layout.decode(self.key_bytes(i)).expect("key should decode"))
            .collect()
    }

    #[must_use]
    pub fn page(&self) -> &[u8] {
        &self.page
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }
}

/// A clock pinned to 2023-11-14T22:13:20Z.
#[must_use]
pub const fn clock() -> FixedTimeSource {
    FixedTimeSource(1_700_000_000_000)
}

/// Parse a time, defaulting to UTC.
#[must_use]
pub fn time(text: &str) -> TimeValue {
    TimeValue::parse(text, &Zone::UTC, &clock()).expect("time should parse")
}

#[must_use]
pub fn point(crs: CoordinateReferenceSystem, coords: &[f64]) -> PointValue {
    PointValue::new(crs, coords).expect("point should be valid")
}

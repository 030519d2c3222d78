//! Key layouts: how values are ordered and serialized inside tree keys.
//!
//! Every layout writes fixed-size keys whose trailing 8 bytes are the
//! entity id. All integers in keys are big-endian, so comparing the
//! sort-relevant prefix byte by byte matches value order and no decode is
//! needed on the search path.
//!
//! Non-unique layouts order by (value, entity id). Unique layouts order by
//! value only, so two entities with the same value collide.
//!
//! | family   | unique | non-unique | key bytes        |
//! |----------|--------|------------|------------------|
//! | temporal | `UTI`  | `NUTI`     | 20               |
//! | spatial  | `UPI`  | `NUPI`     | 32 (2D), 40 (3D) |
//! | number   | `UNI`  | `NUNI`     | 16               |
//! | text     | `USI`  | `NUSI`     | 120              |

mod error;
mod identifier;
mod meta;
mod number;
mod region;
pub mod search;
mod spatial;
mod temporal;
mod text;

use std::cmp::Ordering;

pub use error::{LayoutError, MetaError};
pub use identifier::{Compatibility, LayoutIdentifier, MAX_TAG_LEN};
pub use meta::{META_MAGIC, TreeMeta};
pub use number::NumberLayout;
pub use region::PageRegion;
pub use spatial::SpatialLayout;
pub use temporal::TemporalLayout;
pub use text::{MAX_TEXT_BYTES, TextLayout};

use crate::spatial::{CoordinateReferenceSystem, PointValue};
use crate::temporal::TimeValue;

/// Size of the entity id suffix of every key.
pub const ENTITY_ID_SIZE: usize = 8;

/// Major version shared by all built-in layouts.
pub const LAYOUT_MAJOR: u32 = 0;

/// Minor version shared by all built-in layouts.
pub const LAYOUT_MINOR: u32 = 1;

/// A value paired with the entity it indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexKey<V> {
    pub value: V,
    pub entity_id: u64,
}

impl<V> IndexKey<V> {
    pub const fn new(value: V, entity_id: u64) -> Self {
        Self { value, entity_id }
    }
}

/// The comparator and codec a tree uses for its keys.
///
/// Layouts are immutable after construction and shared between readers and
/// writers without synchronization.
pub trait KeyLayout: std::fmt::Debug + Send + Sync {
    type Value;

    fn identifier(&self) -> LayoutIdentifier;

    fn is_unique(&self) -> bool;

    /// Checksum of the settings that shape keys beyond the identifier
    /// (reference system, curve bounds and precision).
    fn settings_fingerprint(&self) -> u32;

    /// Number of leading key bytes that carry the value's order.
    fn sort_prefix_len(&self) -> usize;

    fn key_size(&self) -> usize {
        self.identifier().key_size()
    }

    /// Order two encoded keys without decoding them.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        compare_keys(self.sort_prefix_len(), self.is_unique(), a, b)
    }

    /// Encode `value` and `entity_id` into `out`, which must be exactly
    /// `key_size()` bytes.
    fn encode_parts(
        &self,
        value: &Self::Value,
        entity_id: u64,
        out: &mut [u8],
    ) -> Result<(), LayoutError>;

    fn decode(&self, bytes: &[u8]) -> Result<IndexKey<Self::Value>, LayoutError>;

    fn encode(&self, key: &IndexKey<Self::Value>, out: &mut [u8]) -> Result<(), LayoutError> {
        self.encode_parts(&key.value, key.entity_id, out)
    }

    /// Encode straight into a page region at `offset`.
    fn write_key<R: PageRegion + ?Sized>(
        &self,
        region: &mut R,
        offset: usize,
        key: &IndexKey<Self::Value>,
    ) -> Result<(), LayoutError>
    where
        Self: Sized,
    {
        let len = self.key_size();
        let out = region
            .region_mut(offset, len)
            .ok_or(LayoutError::RegionOutOfBounds { offset, len })?;
        self.encode(key, out)
    }

    fn read_key<R: PageRegion + ?Sized>(
        &self,
        region: &R,
        offset: usize,
    ) -> Result<IndexKey<Self::Value>, LayoutError>
    where
        Self: Sized,
    {
        self.decode(region.read_bytes(offset, self.key_size())?)
    }
}

/// Byte-wise key order over the first `sort_len` bytes, then the entity id
/// suffix for non-unique layouts.
#[must_use]
pub fn compare_keys(sort_len: usize, unique: bool, a: &[u8], b: &[u8]) -> Ordering {
    let by_value = a
        .get(..sort_len)
        .unwrap_or(a)
        .cmp(b.get(..sort_len).unwrap_or(b));
    if unique || by_value.is_ne() {
        return by_value;
    }
    fn entity(key: &[u8]) -> &[u8] {
        key.get(key.len().saturating_sub(ENTITY_ID_SIZE)..).unwrap_or(key)
    }
    entity(a).cmp(entity(b))
}

fn check_key_len(expected: usize, bytes: &[u8]) -> Result<(), LayoutError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(LayoutError::KeySize {
            expected,
            actual: bytes.len(),
        })
    }
}

/// Read a big-endian u64 at `at`. Callers check the key length first.
fn read_u64_be(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_be_bytes(buf)
}

fn write_u64_be(out: &mut [u8], at: usize, value: u64) {
    out[at..at + 8].copy_from_slice(&value.to_be_bytes());
}

/// Map a float to an integer with the same order under unsigned compare.
const fn f64_to_sortable(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits >> 63 == 1 { !bits } else { bits | (1 << 63) }
}

const fn sortable_to_f64(sortable: u64) -> f64 {
    if sortable >> 63 == 1 {
        f64::from_bits(sortable & !(1 << 63))
    } else {
        f64::from_bits(!sortable)
    }
}

fn fingerprint(family: &str, settings: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(family.as_bytes());
    hasher.update(settings);
    hasher.finalize()
}

/// Identifies one layout in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutKey {
    Temporal { unique: bool },
    Spatial {
        crs: CoordinateReferenceSystem,
        unique: bool,
    },
    Number { unique: bool },
    Text { unique: bool },
}

impl LayoutKey {
    /// The layout that indexes `value`.
    #[must_use]
    pub const fn for_value(value: &IndexValue, unique: bool) -> Self {
        match value {
            IndexValue::Time(_) => Self::Temporal { unique },
            IndexValue::Point(point) => Self::Spatial {
                crs: point.crs(),
                unique,
            },
            IndexValue::Number(_) => Self::Number { unique },
            IndexValue::Text(_) => Self::Text { unique },
        }
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        match *self {
            Self::Temporal { unique }
            | Self::Spatial { unique, .. }
            | Self::Number { unique }
            | Self::Text { unique } => unique,
        }
    }
}

impl std::fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_unique() { "unique" } else { "non-unique" };
        match self {
            Self::Temporal { .. } => write!(f, "{kind} temporal"),
            Self::Spatial { crs, .. } => write!(f, "{kind} spatial ({crs})"),
            Self::Number { .. } => write!(f, "{kind} number"),
            Self::Text { .. } => write!(f, "{kind} text"),
        }
    }
}

/// Any indexable value, for dispatch by value type at index-build time.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexValue {
    Time(TimeValue),
    Point(PointValue),
    Number(f64),
    Text(String),
}

impl IndexValue {
    #[must_use]
    pub const fn family_name(&self) -> &'static str {
        match self {
            Self::Time(_) => temporal::FAMILY,
            Self::Point(_) => spatial::FAMILY,
            Self::Number(_) => number::FAMILY,
            Self::Text(_) => text::FAMILY,
        }
    }
}

/// One of the built-in layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyLayout {
    Temporal(TemporalLayout),
    Spatial(SpatialLayout),
    Number(NumberLayout),
    Text(TextLayout),
}

impl AnyLayout {
    #[must_use]
    pub const fn key(&self) -> LayoutKey {
        match self {
            Self::Temporal(layout) => LayoutKey::Temporal {
                unique: layout.is_unique(),
            },
            Self::Spatial(layout) => LayoutKey::Spatial {
                crs: layout.crs(),
                unique: layout.is_unique(),
            },
            Self::Number(layout) => LayoutKey::Number {
                unique: layout.is_unique(),
            },
            Self::Text(layout) => LayoutKey::Text {
                unique: layout.is_unique(),
            },
        }
    }

    #[must_use]
    pub const fn family_name(&self) -> &'static str {
        match self {
            Self::Temporal(_) => temporal::FAMILY,
            Self::Spatial(_) => spatial::FAMILY,
            Self::Number(_) => number::FAMILY,
            Self::Text(_) => text::FAMILY,
        }
    }

    #[must_use]
    pub const fn as_spatial(&self) -> Option<&SpatialLayout> {
        match self {
            Self::Spatial(layout) => Some(layout),
            _ => None,
        }
    }

    fn wrong_family(&self, value: &IndexValue) -> LayoutError {
        LayoutError::WrongFamily {
            expected: self.family_name(),
            found: value.family_name(),
        }
    }
}

impl KeyLayout for AnyLayout {
    type Value = IndexValue;

    fn identifier(&self) -> LayoutIdentifier {
        match self {
            Self::Temporal(layout) => layout.identifier(),
            Self::Spatial(layout) => layout.identifier(),
            Self::Number(layout) => layout.identifier(),
            Self::Text(layout) => layout.identifier(),
        }
    }

    fn is_unique(&self) -> bool {
        self.key().is_unique()
    }

    fn settings_fingerprint(&self) -> u32 {
        match self {
            Self::Temporal(layout) => layout.settings_fingerprint(),
            Self::Spatial(layout) => layout.settings_fingerprint(),
            Self::Number(layout) => layout.settings_fingerprint(),
            Self::Text(layout) => layout.settings_fingerprint(),
        }
    }

    fn sort_prefix_len(&self) -> usize {
        match self {
            Self::Temporal(layout) => layout.sort_prefix_len(),
            Self::Spatial(layout) => layout.sort_prefix_len(),
            Self::Number(layout) => layout.sort_prefix_len(),
            Self::Text(layout) => layout.sort_prefix_len(),
        }
    }

    fn encode_parts(
        &self,
        value: &IndexValue,
        entity_id: u64,
        out: &mut [u8],
    ) -> Result<(), LayoutError> {
        match (self, value) {
            (Self::Temporal(layout), IndexValue::Time(time)) => {
                layout.encode_parts(time, entity_id, out)
            }
            (Self::Spatial(layout), IndexValue::Point(point)) => {
                layout.encode_parts(point, entity_id, out)
            }
            (Self::Number(layout), IndexValue::Number(number)) => {
                layout.encode_parts(number, entity_id, out)
            }
            (Self::Text(layout), IndexValue::Text(text)) => {
                layout.encode_parts(text, entity_id, out)
            }
            _ => Err(self.wrong_family(value)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<IndexKey<IndexValue>, LayoutError> {
        fn wrap<V>(key: IndexKey<V>, f: impl FnOnce(V) -> IndexValue) -> IndexKey<IndexValue> {
            IndexKey::new(f(key.value), key.entity_id)
        }
        Ok(match self {
            Self::Temporal(layout) => wrap(layout.decode(bytes)?, IndexValue::Time),
            Self::Spatial(layout) => wrap(layout.decode(bytes)?, IndexValue::Point),
            Self::Number(layout) => wrap(layout.decode(bytes)?, IndexValue::Number),
            Self::Text(layout) => wrap(layout.decode(bytes)?, IndexValue::Text),
        })
    }
}

//! Key layout for floating-point numbers.
//!
//! ```text
//! [sortable f64: u64][entity id: u64]
//! ```
//!
//! `-0.0` is stored as `0.0` and every NaN as the canonical NaN, which
//! sorts above positive infinity.

use super::error::LayoutError;
use super::identifier::LayoutIdentifier;
use super::{
    ENTITY_ID_SIZE, IndexKey, KeyLayout, LAYOUT_MAJOR, LAYOUT_MINOR, check_key_len, f64_to_sortable,
    fingerprint, read_u64_be, sortable_to_f64, write_u64_be,
};

pub(super) const FAMILY: &str = "number";

const VALUE_SIZE: usize = 8;

/// Layout for `f64` keys (`UNI` unique, `NUNI` non-unique).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLayout {
    identifier: LayoutIdentifier,
    unique: bool,
}

impl NumberLayout {
    pub const KEY_SIZE: usize = VALUE_SIZE + ENTITY_ID_SIZE;

    pub fn new(unique: bool) -> Result<Self, LayoutError> {
        let tag = if unique { "UNI" } else { "NUNI" };
        Ok(Self {
            identifier: LayoutIdentifier::new(tag, Self::KEY_SIZE, LAYOUT_MAJOR, LAYOUT_MINOR)?,
            unique,
        })
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }
}

fn canonical(value: f64) -> f64 {
    if value.is_nan() {
        f64::NAN
    } else if value.to_bits() << 1 == 0 {
        0.0
    } else {
        value
    }
}

impl KeyLayout for NumberLayout {
    type Value = f64;

    fn identifier(&self) -> LayoutIdentifier {
        self.identifier
    }

    fn is_unique(&self) -> bool {
        self.unique
    }

    fn settings_fingerprint(&self) -> u32 {
        fingerprint(FAMILY, &[])
    }

    fn sort_prefix_len(&self) -> usize {
        VALUE_SIZE
    }

    fn encode_parts(&self, value: &f64, entity_id: u64, out: &mut [u8]) -> Result<(), LayoutError> {
        check_key_len(Self::KEY_SIZE, out)?;
        write_u64_be(out, 0, f64_to_sortable(canonical(*value)));
        write_u64_be(out, VALUE_SIZE, entity_id);
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<IndexKey<f64>, LayoutError> {
        check_key_len(Self::KEY_SIZE, bytes)?;
        Ok(IndexKey::new(
            sortable_to_f64(read_u64_be(bytes, 0)),
            read_u64_be(bytes, VALUE_SIZE),
        ))
    }
}

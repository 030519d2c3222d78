//! Key layout for time values.
//!
//! ```text
//! [utc nanos of day: u64][offset seconds: i32, sign bit flipped][entity id: u64]
//! ```
//!
//! Only the instant orders keys. The offset rides along so a decoded value
//! keeps the wall-clock representation it was written with.

use super::error::LayoutError;
use super::identifier::LayoutIdentifier;
use super::{
    ENTITY_ID_SIZE, IndexKey, KeyLayout, LAYOUT_MAJOR, LAYOUT_MINOR, check_key_len, fingerprint,
    read_u64_be, write_u64_be,
};
use crate::temporal::TimeValue;

pub(super) const FAMILY: &str = "temporal";

mod offsets {
    pub const INSTANT: usize = 0;
    pub const OFFSET: usize = 8;
    pub const ENTITY: usize = 12;
}

const SIGN_FLIP: u32 = 1 << 31;

/// Layout for `TimeValue` keys (`UTI` unique, `NUTI` non-unique).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalLayout {
    identifier: LayoutIdentifier,
    unique: bool,
}

impl TemporalLayout {
    pub const KEY_SIZE: usize = offsets::ENTITY + ENTITY_ID_SIZE;

    pub fn new(unique: bool) -> Result<Self, LayoutError> {
        let tag = if unique { "UTI" } else { "NUTI" };
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

impl KeyLayout for TemporalLayout {
    type Value = TimeValue;

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
        offsets::OFFSET
    }

    fn encode_parts(
        &self,
        value: &TimeValue,
        entity_id: u64,
        out: &mut [u8],
    ) -> Result<(), LayoutError> {
        check_key_len(Self::KEY_SIZE, out)?;
        let (instant, offset_seconds) = value.to_key_parts();
        write_u64_be(out, offsets::INSTANT, instant);
        out[offsets::OFFSET..offsets::ENTITY]
            .copy_from_slice(&(offset_seconds.cast_unsigned() ^ SIGN_FLIP).to_be_bytes());
        write_u64_be(out, offsets::ENTITY, entity_id);
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<IndexKey<TimeValue>, LayoutError> {
        check_key_len(Self::KEY_SIZE, bytes)?;
        let mut offset = [0u8; 4];
        offset.copy_from_slice(&bytes[offsets::OFFSET..offsets::ENTITY]);
        let offset_seconds = (u32::from_be_bytes(offset) ^ SIGN_FLIP).cast_signed();
        let instant = read_u64_be(bytes, offsets::INSTANT);
        let value = TimeValue::from_key_parts(instant, offset_seconds)?;
        Ok(IndexKey::new(value, read_u64_be(bytes, offsets::ENTITY)))
    }
}

//! Key layout for short strings.
//!
//! ```text
//! [utf-8 bytes, zero padded: 110][byte length: u16][entity id: u64]
//! ```
//!
//! Zero padding sorts below every other byte and the length breaks ties
//! between a string and the same string with trailing NULs, so comparing
//! the first 112 bytes orders keys by UTF-8 bytes, then by length.

use super::error::LayoutError;
use super::identifier::LayoutIdentifier;
use super::{
    ENTITY_ID_SIZE, IndexKey, KeyLayout, LAYOUT_MAJOR, LAYOUT_MINOR, check_key_len, fingerprint,
    read_u64_be, write_u64_be,
};

pub(super) const FAMILY: &str = "text";

/// Longest string, in UTF-8 bytes, a text key can hold.
pub const MAX_TEXT_BYTES: usize = 110;

const LENGTH_SIZE: usize = 2;
const ENTITY_OFFSET: usize = MAX_TEXT_BYTES + LENGTH_SIZE;

/// Layout for `String` keys (`USI` unique, `NUSI` non-unique).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    identifier: LayoutIdentifier,
    unique: bool,
}

impl TextLayout {
    pub const KEY_SIZE: usize = ENTITY_OFFSET + ENTITY_ID_SIZE;

    pub fn new(unique: bool) -> Result<Self, LayoutError> {
        let tag = if unique { "USI" } else { "NUSI" };
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

impl KeyLayout for TextLayout {
    type Value = String;

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
        ENTITY_OFFSET
    }

    fn encode_parts(
        &self,
        value: &String,
        entity_id: u64,
        out: &mut [u8],
    ) -> Result<(), LayoutError> {
        check_key_len(Self::KEY_SIZE, out)?;
        let bytes = value.as_bytes();
        let len = u16::try_from(bytes.len())
            .ok()
            .filter(|&len| usize::from(len) <= MAX_TEXT_BYTES)
            .ok_or(LayoutError::ValueTooLarge {
                len: bytes.len(),
                max: MAX_TEXT_BYTES,
            })?;
        out[..bytes.len()].copy_from_slice(bytes);
        out[bytes.len()..MAX_TEXT_BYTES].fill(0);
        out[MAX_TEXT_BYTES..ENTITY_OFFSET].copy_from_slice(&len.to_be_bytes());
        write_u64_be(out, ENTITY_OFFSET, entity_id);
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<IndexKey<String>, LayoutError> {
        check_key_len(Self::KEY_SIZE, bytes)?;
        let len =
            usize::from(u16::from_be_bytes([bytes[MAX_TEXT_BYTES], bytes[MAX_TEXT_BYTES + 1]]));
        if len > MAX_TEXT_BYTES {
            return Err(LayoutError::Corrupt(format!("text length {len} exceeds {MAX_TEXT_BYTES}")));
        }
        let text = std::str::from_utf8(&bytes[..len])
            .map_err(|e| LayoutError::Corrupt(format!("text is not UTF-8: {e}")))?;
        Ok(IndexKey::new(text.to_owned(), read_u64_be(bytes, ENTITY_OFFSET)))
    }
}

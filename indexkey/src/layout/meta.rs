//! Persisted tree metadata.
//!
//! Written once when a tree is created and checked on every open, before
//! any key is read with the running code's layout.

use tracing::{debug, warn};

use super::error::{LayoutError, MetaError};
use super::identifier::{Compatibility, LayoutIdentifier};
use super::region::PageRegion;
use super::KeyLayout;

/// Magic number identifying index-key tree metadata: "IKEY"
pub const META_MAGIC: [u8; 4] = *b"IKEY";

/// Metadata field offsets.
mod offsets {
    pub const MAGIC: usize = 0;
    pub const LAYOUT_ID: usize = 4;
    pub const SETTINGS: usize = 12;
    pub const CHECKSUM: usize = 16;
}

/// Layout identity recorded in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMeta {
    /// Identifier of the layout the tree was built with.
    pub identifier: LayoutIdentifier,
    /// Fingerprint of the layout settings the tree was built with.
    pub settings_fingerprint: u32,
}

impl TreeMeta {
    /// Size of the serialized record in bytes.
    pub const SIZE: usize = offsets::CHECKSUM + 4;

    /// Metadata for a new tree using `layout`.
    pub fn for_layout<L: KeyLayout + ?Sized>(layout: &L) -> Self {
        Self {
            identifier: layout.identifier(),
            settings_fingerprint: layout.settings_fingerprint(),
        }
    }

    /// Serialize into `region` at `offset`.
    pub fn write_to<R: PageRegion + ?Sized>(
        &self,
        region: &mut R,
        offset: usize,
    ) -> Result<(), MetaError> {
        let mut record = [0u8; Self::SIZE];
        record.write_bytes(offsets::MAGIC, &META_MAGIC)?;
        record.write_u64(offsets::LAYOUT_ID, self.identifier.word())?;
        record.write_u32(offsets::SETTINGS, self.settings_fingerprint)?;
        let checksum = crc32fast::hash(&record[..offsets::CHECKSUM]);
        record.write_u32(offsets::CHECKSUM, checksum)?;
        region.write_bytes(offset, &record)?;
        Ok(())
    }

    /// Deserialize from `region` at `offset`.
    pub fn read_from<R: PageRegion + ?Sized>(region: &R, offset: usize) -> Result<Self, MetaError> {
        let record = region.read_bytes(offset, Self::SIZE)?;

        // Validate magic number
        let mut magic = [0u8; 4];
        magic.copy_from_slice(record.read_bytes(offsets::MAGIC, 4)?);
        if magic != META_MAGIC {
            return Err(MetaError::InvalidMagic(magic));
        }

        let expected = record.read_u32(offsets::CHECKSUM)?;
        let actual = crc32fast::hash(&record[..offsets::CHECKSUM]);
        if expected != actual {
            return Err(MetaError::ChecksumMismatch { expected, actual });
        }

        Ok(Self {
            identifier: LayoutIdentifier::from_word(record.read_u64(offsets::LAYOUT_ID)?)?,
            settings_fingerprint: record.read_u32(offsets::SETTINGS)?,
        })
    }

    /// Check that a tree with this metadata can be read with `layout`.
    ///
    /// Tag, size, major version or settings differences refuse the open. A
    /// minor version difference is logged and returned for the caller to
    /// act on.
    pub fn validate<L: KeyLayout + ?Sized>(&self, layout: &L) -> Result<Compatibility, MetaError> {
        let expected = layout.identifier();
        let compatibility = LayoutIdentifier::check_compatible(expected, self.identifier)
            .inspect_err(|_| {
                warn!(%expected, found = %self.identifier, "tree layout does not match");
            })?;

        if self.settings_fingerprint != layout.settings_fingerprint() {
            warn!(
                layout = %expected,
                expected = layout.settings_fingerprint(),
                found = self.settings_fingerprint,
                "tree was built with different layout settings"
            );
            return Err(LayoutError::FormatMismatch {
                expected,
                found: self.identifier,
            }
            .into());
        }

        match compatibility {
            Compatibility::Exact => debug!(layout = %expected, "tree layout verified"),
            Compatibility::MinorMismatch { expected: ours, found } => warn!(
                layout = %expected,
                ours,
                found,
                "tree layout minor version differs"
            ),
        }
        Ok(compatibility)
    }
}

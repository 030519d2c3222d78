//! Layout and tree-metadata errors.

use crate::spatial::SpatialError;
use crate::temporal::TemporalError;

use super::identifier::LayoutIdentifier;

/// Errors from identifiers, key codecs and page regions.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A tag, size or version does not fit the identifier word.
    IdentifierOverflow(String),
    /// A persisted identifier (or settings fingerprint) differs from the
    /// running code's in tag, size, major version or settings.
    FormatMismatch {
        expected: LayoutIdentifier,
        found: LayoutIdentifier,
    },
    /// A key buffer has the wrong length for this layout.
    KeySize { expected: usize, actual: usize },
    /// Key bytes that no valid value encodes to.
    Corrupt(String),
    /// A value whose encoding exceeds the fixed key width.
    ValueTooLarge { len: usize, max: usize },
    /// A page region read or write past the end of the page.
    RegionOutOfBounds { offset: usize, len: usize },
    /// A value of one family given to a layout of another.
    WrongFamily {
        expected: &'static str,
        found: &'static str,
    },
    Temporal(TemporalError),
    Spatial(SpatialError),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentifierOverflow(message) => write!(f, "identifier overflow: {message}"),
            Self::FormatMismatch { expected, found } => {
                write!(f, "format mismatch: expected {expected}, found {found}")
            }
            Self::KeySize { expected, actual } => {
                write!(f, "key is {actual} bytes, layout requires {expected}")
            }
            Self::Corrupt(message) => write!(f, "corrupt key: {message}"),
            Self::ValueTooLarge { len, max } => {
                write!(f, "value encodes to {len} bytes, maximum is {max}")
            }
            Self::RegionOutOfBounds { offset, len } => {
                write!(f, "region [{offset}, {offset}+{len}) is out of bounds")
            }
            Self::WrongFamily { expected, found } => {
                write!(f, "layout stores {expected} values, got {found}")
            }
            Self::Temporal(e) => write!(f, "temporal error: {e}"),
            Self::Spatial(e) => write!(f, "spatial error: {e}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Temporal(e) => Some(e),
            Self::Spatial(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TemporalError> for LayoutError {
    fn from(e: TemporalError) -> Self {
        Self::Temporal(e)
    }
}

impl From<SpatialError> for LayoutError {
    fn from(e: SpatialError) -> Self {
        Self::Spatial(e)
    }
}

/// Errors reading persisted tree metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaError {
    /// The region does not start with the metadata magic.
    InvalidMagic([u8; 4]),
    /// The stored checksum does not match the record.
    ChecksumMismatch { expected: u32, actual: u32 },
    Layout(LayoutError),
}

impl std::fmt::Display for MetaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMagic(magic) => {
                write!(f, "invalid magic number: {:?}", String::from_utf8_lossy(magic))
            }
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch: stored {expected:#010x}, computed {actual:#010x}"
            ),
            Self::Layout(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MetaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for MetaError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

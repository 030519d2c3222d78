//! Versioned layout identifiers.
//!
//! A layout identifier names the key format of a tree. It is packed into one
//! 64-bit word, written into tree metadata when the tree is created and
//! checked against the running code on every open.
//!
//! Word layout (most significant bit first):
//!
//! ```text
//! 63            32 31        16 15     8 7      0
//! +---------------+------------+--------+--------+
//! | tag (4 ASCII) | key size   | major  | minor  |
//! +---------------+------------+--------+--------+
//! ```
//!
//! Tags shorter than four characters are right-aligned, so the unused
//! leading bytes are zero.

use super::error::LayoutError;

/// Maximum number of characters in a layout tag.
pub const MAX_TAG_LEN: usize = 4;

/// Field positions within the identifier word.
mod shifts {
    pub const TAG: u32 = 32;
    pub const KEY_SIZE: u32 = 16;
    pub const MAJOR: u32 = 8;
}

/// Identity of a key layout: tag, key width and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutIdentifier {
    tag: [u8; MAX_TAG_LEN],
    key_size: u16,
    major: u8,
    minor: u8,
}

/// Outcome of comparing a persisted identifier with the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Exact,
    /// Same tag, size and major version; minor versions differ. The caller
    /// decides whether to upgrade in place or refuse.
    MinorMismatch { expected: u8, found: u8 },
}

impl LayoutIdentifier {
    /// Validate and build an identifier.
    pub fn new(tag: &str, key_size: usize, major: u32, minor: u32) -> Result<Self, LayoutError> {
        let bytes = tag.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_TAG_LEN {
            return Err(LayoutError::IdentifierOverflow(format!(
                "tag {tag:?} must have 1 to {MAX_TAG_LEN} characters"
            )));
        }
        if !bytes.iter().all(u8::is_ascii_graphic) {
            return Err(LayoutError::IdentifierOverflow(format!(
                "tag {tag:?} must be printable ASCII"
            )));
        }
        let key_size = u16::try_from(key_size).map_err(|_| {
            LayoutError::IdentifierOverflow(format!("key size {key_size} exceeds 16 bits"))
        })?;
        let major = u8::try_from(major).map_err(|_| {
            LayoutError::IdentifierOverflow(format!("major version {major} exceeds 8 bits"))
        })?;
        let minor = u8::try_from(minor).map_err(|_| {
            LayoutError::IdentifierOverflow(format!("minor version {minor} exceeds 8 bits"))
        })?;

        let mut packed_tag = [0u8; MAX_TAG_LEN];
        packed_tag[MAX_TAG_LEN - bytes.len()..].copy_from_slice(bytes);
        Ok(Self {
            tag: packed_tag,
            key_size,
            major,
            minor,
        })
    }

    /// Pack into the persisted 64-bit word.
    #[must_use]
    pub const fn word(&self) -> u64 {
        ((u32::from_be_bytes(self.tag) as u64) << shifts::TAG)
            | ((self.key_size as u64) << shifts::KEY_SIZE)
            | ((self.major as u64) << shifts::MAJOR)
            | self.minor as u64
    }

    /// Unpack a persisted word, rejecting tags no valid identifier produces.
    pub fn from_word(word: u64) -> Result<Self, LayoutError> {
        let tag = ((word >> shifts::TAG) as u32).to_be_bytes();
        let start = tag.iter().position(|&b| b != 0).unwrap_or(MAX_TAG_LEN);
        if start == MAX_TAG_LEN || !tag[start..].iter().all(u8::is_ascii_graphic) {
            return Err(LayoutError::Corrupt(format!(
                "identifier word {word:#018x} has no valid tag"
            )));
        }
        Ok(Self {
            tag,
            key_size: (word >> shifts::KEY_SIZE) as u16,
            major: (word >> shifts::MAJOR) as u8,
            minor: word as u8,
        })
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.tag
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect()
    }

    #[must_use]
    pub const fn key_size(&self) -> usize {
        self.key_size as usize
    }

    #[must_use]
    pub const fn major(&self) -> u8 {
        self.major
    }

    #[must_use]
    pub const fn minor(&self) -> u8 {
        self.minor
    }

    /// Compare a persisted identifier against the one the running code
    /// expects.
    ///
    /// Tag, size or major differences are fatal for the tree. A minor
    /// difference is only reported.
    pub fn check_compatible(expected: Self, found: Self) -> Result<Compatibility, LayoutError> {
        if expected.tag != found.tag
            || expected.key_size != found.key_size
            || expected.major != found.major
        {
            return Err(LayoutError::FormatMismatch { expected, found });
        }
        if expected.minor == found.minor {
            Ok(Compatibility::Exact)
        } else {
            Ok(Compatibility::MinorMismatch {
                expected: expected.minor,
                found: found.minor,
            })
        }
    }
}

impl std::fmt::Display for LayoutIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} v{}.{}",
            self.tag(),
            self.key_size,
            self.major,
            self.minor
        )
    }
}

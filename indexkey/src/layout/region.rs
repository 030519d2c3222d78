//! Fixed-size byte regions of a page.
//!
//! The page manager owns pages; key codecs only need to read and write
//! byte ranges at an offset. `PageRegion` is that capability, with bounds
//! checked instead of panicking.

use super::error::LayoutError;

/// Byte-range access into a page buffer.
pub trait PageRegion {
    /// The `len` bytes at `offset`, or `None` past the end.
    fn region(&self, offset: usize, len: usize) -> Option<&[u8]>;

    fn region_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]>;

    /// Read bytes at a specific offset.
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8], LayoutError> {
        self.region(offset, len)
            .ok_or(LayoutError::RegionOutOfBounds { offset, len })
    }

    /// Write bytes at a specific offset.
    fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), LayoutError> {
        let len = bytes.len();
        self.region_mut(offset, len)
            .ok_or(LayoutError::RegionOutOfBounds { offset, len })?
            .copy_from_slice(bytes);
        Ok(())
    }

    /// Read a u32 (little-endian) at the given offset.
    fn read_u32(&self, offset: usize) -> Result<u32, LayoutError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.read_bytes(offset, 4)?);
        Ok(u32::from_le_bytes(buf))
    }

    /// Write a u32 (little-endian) at the given offset.
    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), LayoutError> {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    /// Read a u64 (little-endian) at the given offset.
    fn read_u64(&self, offset: usize) -> Result<u64, LayoutError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_bytes(offset, 8)?);
        Ok(u64::from_le_bytes(buf))
    }

    /// Write a u64 (little-endian) at the given offset.
    fn write_u64(&mut self, offset: usize, value: u64) -> Result<(), LayoutError> {
        self.write_bytes(offset, &value.to_le_bytes())
    }
}

impl PageRegion for [u8] {
    fn region(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.get(offset..offset.checked_add(len)?)
    }

    fn region_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        self.get_mut(offset..offset.checked_add(len)?)
    }
}

impl PageRegion for Vec<u8> {
    fn region(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.as_slice().region(offset, len)
    }

    fn region_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        self.as_mut_slice().region_mut(offset, len)
    }
}

impl<const N: usize> PageRegion for [u8; N] {
    fn region(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.as_slice().region(offset, len)
    }

    fn region_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        self.as_mut_slice().region_mut(offset, len)
    }
}

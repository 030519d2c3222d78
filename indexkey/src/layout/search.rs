//! Comparator-driven search over contiguous fixed-size keys.
//!
//! Nodes store keys back to back starting at `base`. Searches compare
//! encoded bytes with the layout's comparator and never decode.

use std::cmp::Ordering;

use super::error::LayoutError;
use super::region::PageRegion;
use super::KeyLayout;

/// Binary search `count` keys starting at `base` for `target`.
///
/// Returns `Ok(index)` of the first key equal to `target`, or
/// `Err(insert_position)` where it would go to keep the keys sorted.
pub fn find_key<L, R>(
    layout: &L,
    region: &R,
    base: usize,
    count: usize,
    target: &[u8],
) -> Result<Result<usize, usize>, LayoutError>
where
    L: KeyLayout + ?Sized,
    R: PageRegion + ?Sized,
{
    let size = layout.key_size();
    // Binary search for the first key >= target
    let (mut low, mut high) = (0, count);
    while low < high {
        let mid = low + (high - low) / 2;
        let key = region.read_bytes(base + mid * size, size)?;
        if layout.compare(key, target) == Ordering::Less {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    if low < count {
        let key = region.read_bytes(base + low * size, size)?;
        if layout.compare(key, target) == Ordering::Equal {
            return Ok(Ok(low));
        }
    }
    Ok(Err(low))
}

/// Shift keys right and write `key` at its sorted position.
///
/// `region` must have room for `count + 1` keys. Returns the position the
/// key was written to.
pub fn insert_key<L, R>(
    layout: &L,
    region: &mut R,
    base: usize,
    count: usize,
    key: &[u8],
) -> Result<usize, LayoutError>
where
    L: KeyLayout + ?Sized,
    R: PageRegion + ?Sized,
{
    let size = layout.key_size();
    if key.len() != size {
        return Err(LayoutError::KeySize {
            expected: size,
            actual: key.len(),
        });
    }
    let position = match find_key(layout, region, base, count, key)? {
        Ok(index) | Err(index) => index,
    };
    let start = base + position * size;
    let tail_len = (count - position) * size;
    region
        .region_mut(start, tail_len + size)
        .ok_or(LayoutError::RegionOutOfBounds {
            offset: start,
            len: tail_len + size,
        })?
        .copy_within(0..tail_len, size);
    region.write_bytes(start, key)?;
    Ok(position)
}

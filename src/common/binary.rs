//! Bounds-checked integer reads over byte prefixes.
//!
//! Container-aware matchers peek at header fields of ZIP, OLE2, ELF and
//! ISO-BMFF structures. Every read here checks the slice length first, so a
//! truncated prefix turns into an error instead of a panic; matchers map
//! that error to "no match".

use thiserror::Error;
use zerocopy::{BE, FromBytes, LE, U16, U32};

/// Failed bounded read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryError {
    /// The prefix ends before the requested range does
    #[error("read past end of prefix: need {end} bytes, have {available}")]
    Truncated { end: usize, available: usize },
    /// Offset plus length does not fit in `usize`
    #[error("read range overflows")]
    Overflow,
}

/// Result type for bounded reads
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Borrow `len` bytes starting at `offset`.
///
/// ```
/// use longan::common::binary::read_bytes;
///
/// let header = b"\x1A\x45\xDF\xA3\x9F";
/// assert_eq!(read_bytes(header, 1, 3).unwrap(), b"\x45\xDF\xA3");
/// assert!(read_bytes(header, 4, 2).is_err());
/// ```
#[inline]
pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> BinaryResult<&[u8]> {
    let end = offset.checked_add(len).ok_or(BinaryError::Overflow)?;
    data.get(offset..end).ok_or(BinaryError::Truncated {
        end,
        available: data.len(),
    })
}

/// Decode a zerocopy integer wrapper from exactly its size in bytes.
#[inline]
fn read_int<T: FromBytes>(data: &[u8], offset: usize) -> BinaryResult<T> {
    let bytes = read_bytes(data, offset, size_of::<T>())?;
    // Length was checked above; the read cannot fail for unaligned wrappers.
    T::read_from_bytes(bytes).map_err(|_| BinaryError::Truncated {
        end: offset + bytes.len(),
        available: data.len(),
    })
}

/// Little-endian `u16` at `offset`, as in ZIP, OLE2 and little-endian ELF headers.
///
/// ```
/// use longan::common::binary::read_u16_le;
///
/// // General purpose flags of a ZIP local header using a data descriptor.
/// let header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x08, 0x00];
/// assert_eq!(read_u16_le(&header, 6).unwrap(), 0x0008);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    read_int::<U16<LE>>(data, offset).map(U16::get)
}

/// Big-endian `u16` at `offset`.
#[inline]
pub fn read_u16_be(data: &[u8], offset: usize) -> BinaryResult<u16> {
    read_int::<U16<BE>>(data, offset).map(U16::get)
}

/// Little-endian `u32` at `offset`.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    read_int::<U32<LE>>(data, offset).map(U32::get)
}

/// Big-endian `u32` at `offset`, as in ISO-BMFF box sizes.
///
/// ```
/// use longan::common::binary::read_u32_be;
///
/// assert_eq!(read_u32_be(b"\x00\x00\x00\x18ftyp", 0).unwrap(), 24);
/// ```
#[inline]
pub fn read_u32_be(data: &[u8], offset: usize) -> BinaryResult<u32> {
    read_int::<U32<BE>>(data, offset).map(U32::get)
}

/// Compare a fixed-length UTF-16LE field against an ASCII/Unicode name.
///
/// `data` holds the raw code units; comparison stops at the first NUL unit
/// or at the end of the slice, whichever comes first. A trailing odd byte is
/// ignored.
pub fn utf16le_eq(data: &[u8], name: &str) -> bool {
    let units = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0);
    units.eq(name.encode_utf16())
}

/// Check whether a UTF-16LE field starts with `prefix`.
pub fn utf16le_starts_with(data: &[u8], prefix: &str) -> bool {
    let mut units = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0);
    prefix
        .encode_utf16()
        .all(|expected| units.next() == Some(expected))
}

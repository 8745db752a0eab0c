//! Audio and video containers whose sub-formats need a look past the magic.

use crate::common::binary::{read_bytes, read_u32_be};
use crate::magic::{MaskedSignature, find_pattern, signature_matches};

/// EBML header magic shared by Matroska and WebM.
pub const EBML_SIGNATURE: &[u8] = &[0x1A, 0x45, 0xDF, 0xA3];
const EBML_DOCTYPE_ID: &[u8] = &[0x42, 0x82];
/// The DocType element sits in the EBML header, well within this window.
const EBML_HEADER_WINDOW: usize = 64;

// Sync word (11 bits) plus layer III (bits 2-1 of the second byte = 01).
const MPEG_LAYER3_FRAME: MaskedSignature = MaskedSignature::new(0, &[0xFF, 0xE2], &[0xFF, 0xE6]);

/// MPEG-1/2 audio layer III: an ID3v2 tag or a bare frame header.
pub fn is_mp3(data: &[u8]) -> bool {
    if signature_matches(data, b"ID3") {
        return true;
    }
    if !MPEG_LAYER3_FRAME.test(data) {
        return false;
    }
    // Bitrate index 0b1111 and sampling index 0b11 are reserved.
    data.get(2)
        .is_some_and(|&b| b >> 4 != 0x0F && (b >> 2) & 0x03 != 0x03)
}

/// DocType string of an EBML header, if visible.
pub fn ebml_doctype(data: &[u8]) -> Option<&[u8]> {
    if !signature_matches(data, EBML_SIGNATURE) {
        return None;
    }
    let window = &data[..data.len().min(EBML_HEADER_WINDOW)];
    let id = find_pattern(window, EBML_DOCTYPE_ID)?;
    let size_pos = id + EBML_DOCTYPE_ID.len();
    let size = *window.get(size_pos)?;
    // Only one-byte EBML sizes (high bit set) are used for DocType.
    if size & 0x80 == 0 {
        return None;
    }
    read_bytes(data, size_pos + 1, (size & 0x7F) as usize).ok()
}

pub fn is_webm(data: &[u8]) -> bool {
    ebml_doctype(data) == Some(&b"webm"[..])
}

/// Major brand of an ISO base media `ftyp` box at offset zero.
pub fn ftyp_major_brand(data: &[u8]) -> Option<&[u8]> {
    if read_bytes(data, 4, 4).ok()? != b"ftyp" {
        return None;
    }
    let size = read_u32_be(data, 0).ok()?;
    // Box size covers header, major brand and minor version at least.
    if size < 16 {
        return None;
    }
    read_bytes(data, 8, 4).ok()
}

/// Any ISO base media file opening with an `ftyp` box.
pub fn is_iso_bmff(data: &[u8]) -> bool {
    ftyp_major_brand(data).is_some()
}

fn major_brand_in(data: &[u8], brands: &[&[u8]]) -> bool {
    ftyp_major_brand(data).is_some_and(|brand| brands.contains(&brand))
}

pub fn is_quicktime(data: &[u8]) -> bool {
    major_brand_in(data, &[b"qt  "])
}

pub fn is_3gpp(data: &[u8]) -> bool {
    ftyp_major_brand(data).is_some_and(|brand| brand.starts_with(b"3gp"))
}

pub fn is_m4a(data: &[u8]) -> bool {
    major_brand_in(data, &[b"M4A ", b"M4B ", b"F4A "])
}

pub fn is_heic(data: &[u8]) -> bool {
    major_brand_in(data, &[b"heic", b"heix", b"heim", b"heis"])
}

pub fn is_avif(data: &[u8]) -> bool {
    major_brand_in(data, &[b"avif", b"avis"])
}

//! OLE2 compound file detection (legacy Office documents, MSI, Outlook).
//!
//! All of these share the compound-file signature. The application is named
//! by the CLSID of the root directory entry and, failing that, by the stream
//! names in the first directory sector. Both sit early in the file for the
//! common 512-byte sector layout, so they are usually inside the prefix.
//! 4096-byte sector files place the directory past any sensible prefix and
//! stay generic.

use crate::common::binary::{read_bytes, read_u16_le, read_u32_le, utf16le_eq, utf16le_starts_with};
use crate::magic::signature_matches;

/// Compound file signature.
pub const OLE2_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const SECTOR_SHIFT_OFFSET: usize = 0x1E;
const FIRST_DIR_SECTOR_OFFSET: usize = 0x30;
const DIR_ENTRY_LEN: usize = 128;
const DIR_NAME_LEN: usize = 64;
const DIR_NAME_SIZE_OFFSET: usize = 0x40;
const DIR_CLSID_OFFSET: usize = 0x50;
const CLSID_LEN: usize = 16;

// Root entry CLSIDs in their on-disk (mixed-endian) byte order.
const CLSID_WORD_97: [u8; 16] = clsid(0x0002_0906, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);
const CLSID_WORD_6: [u8; 16] = clsid(0x0002_0900, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);
const CLSID_EXCEL_97: [u8; 16] = clsid(0x0002_0820, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);
const CLSID_EXCEL_5: [u8; 16] = clsid(0x0002_0810, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);
const CLSID_POWERPOINT: [u8; 16] = clsid(
    0x6481_8D10,
    0x4F9B,
    0x11CF,
    [0x86, 0xEA, 0x00, 0xAA, 0x00, 0xB9, 0x29, 0xE8],
);
const CLSID_MSI: [u8; 16] = clsid(0x000C_1084, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);
const CLSID_MSI_PATCH: [u8; 16] =
    clsid(0x000C_1086, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);
const CLSID_OUTLOOK_MSG: [u8; 16] =
    clsid(0x0002_0D0B, 0x0000, 0x0000, [0xC0, 0, 0, 0, 0, 0, 0, 0x46]);

const fn clsid(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> [u8; 16] {
    let a = data1.to_le_bytes();
    let b = data2.to_le_bytes();
    let c = data3.to_le_bytes();
    [
        a[0], a[1], a[2], a[3], b[0], b[1], c[0], c[1], data4[0], data4[1], data4[2], data4[3],
        data4[4], data4[5], data4[6], data4[7],
    ]
}

/// Application stored in a compound file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OleKind {
    Word,
    Excel,
    PowerPoint,
    Installer,
    OutlookMessage,
}

/// Whether `data` starts with the compound-file signature.
#[inline]
pub fn is_ole2(data: &[u8]) -> bool {
    signature_matches(data, OLE2_SIGNATURE)
}

/// Offset of the first directory sector, if it lies inside `data`.
fn directory_offset(data: &[u8]) -> Option<usize> {
    let shift = read_u16_le(data, SECTOR_SHIFT_OFFSET).ok()?;
    // Version 3 files use 512-byte sectors, version 4 use 4096.
    if shift != 9 && shift != 12 {
        return None;
    }
    let sector_size = 1usize << shift;
    let first_dir = read_u32_le(data, FIRST_DIR_SECTOR_OFFSET).ok()? as usize;
    // Sector N starts after the header, which occupies one sector.
    let offset = first_dir.checked_add(1)?.checked_mul(sector_size)?;
    (offset < data.len()).then_some(offset)
}

fn kind_from_clsid(clsid: &[u8]) -> Option<OleKind> {
    match clsid {
        c if c == CLSID_WORD_97 || c == CLSID_WORD_6 => Some(OleKind::Word),
        c if c == CLSID_EXCEL_97 || c == CLSID_EXCEL_5 => Some(OleKind::Excel),
        c if c == CLSID_POWERPOINT => Some(OleKind::PowerPoint),
        c if c == CLSID_MSI || c == CLSID_MSI_PATCH => Some(OleKind::Installer),
        c if c == CLSID_OUTLOOK_MSG => Some(OleKind::OutlookMessage),
        _ => None,
    }
}

fn kind_from_stream_name(name: &[u8]) -> Option<OleKind> {
    if utf16le_eq(name, "WordDocument") {
        Some(OleKind::Word)
    } else if utf16le_eq(name, "Workbook") || utf16le_eq(name, "Book") {
        Some(OleKind::Excel)
    } else if utf16le_eq(name, "PowerPoint Document") {
        Some(OleKind::PowerPoint)
    } else if utf16le_starts_with(name, "__substg1.0_") {
        Some(OleKind::OutlookMessage)
    } else {
        None
    }
}

/// Classify a compound file by its root CLSID, then by visible stream names.
pub fn ole_kind(data: &[u8]) -> Option<OleKind> {
    if !is_ole2(data) {
        return None;
    }
    let dir = directory_offset(data)?;

    if let Ok(root_clsid) = read_bytes(data, dir + DIR_CLSID_OFFSET, CLSID_LEN)
        && let Some(kind) = kind_from_clsid(root_clsid)
    {
        return Some(kind);
    }

    data[dir..]
        .chunks_exact(DIR_ENTRY_LEN)
        .find_map(|entry| {
            let name_size = read_u16_le(entry, DIR_NAME_SIZE_OFFSET).ok()? as usize;
            let name = &entry[..name_size.min(DIR_NAME_LEN)];
            kind_from_stream_name(name)
        })
}

pub fn is_doc(data: &[u8]) -> bool {
    ole_kind(data) == Some(OleKind::Word)
}

pub fn is_xls(data: &[u8]) -> bool {
    ole_kind(data) == Some(OleKind::Excel)
}

pub fn is_ppt(data: &[u8]) -> bool {
    ole_kind(data) == Some(OleKind::PowerPoint)
}

pub fn is_msi(data: &[u8]) -> bool {
    ole_kind(data) == Some(OleKind::Installer)
}

pub fn is_msg(data: &[u8]) -> bool {
    ole_kind(data) == Some(OleKind::OutlookMessage)
}

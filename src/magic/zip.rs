//! ZIP-based format detection.
//!
//! OOXML, OpenDocument, EPUB, JAR, APK and iWork documents are all ZIP
//! archives. Telling them apart means looking at the entries, but only the
//! entries whose local file headers fall inside the prefix are visible. The
//! central directory lives at the end of the archive and is out of reach, so
//! everything here walks local headers front to back.

use crate::common::binary::{read_bytes, read_u16_le, read_u32_le};
use crate::magic::{find_pattern, signature_matches};

/// Local file header signature.
pub const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
/// End of central directory signature; starts an empty archive.
pub const EMPTY_ARCHIVE_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x05, 0x06];
/// Data descriptor signature; starts a spanned archive.
pub const SPANNED_ARCHIVE_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x07, 0x08];

const LOCAL_HEADER_LEN: usize = 30;
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
const METHOD_STORED: u16 = 0;
const JAR_MAGIC_EXTRA_ID: u16 = 0xCAFE;

/// One local file header and the visible part of its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalEntry<'a> {
    /// Raw entry name as stored in the header.
    pub name: &'a [u8],
    /// Extra field bytes.
    pub extra: &'a [u8],
    /// Compression method.
    pub method: u16,
    /// Entry data. Exactly the compressed size when the header records it,
    /// otherwise everything up to the next header; truncated at the end of
    /// the prefix either way.
    pub data: &'a [u8],
}

impl LocalEntry<'_> {
    /// Whether the entry is stored without compression.
    #[inline]
    pub fn is_stored(&self) -> bool {
        self.method == METHOD_STORED
    }

    /// Whether the extra field carries a block with the given header ID.
    pub fn has_extra_id(&self, id: u16) -> bool {
        let mut pos = 0;
        while let (Ok(block_id), Ok(size)) =
            (read_u16_le(self.extra, pos), read_u16_le(self.extra, pos + 2))
        {
            if block_id == id {
                return true;
            }
            pos += 4 + size as usize;
        }
        false
    }
}

/// Iterator over the local file headers visible in a prefix.
///
/// Iteration stops at the first position that does not hold a complete
/// local file header, so garbage after the last visible entry is ignored.
#[derive(Debug, Clone)]
pub struct LocalEntries<'a> {
    data: &'a [u8],
    pos: Option<usize>,
}

impl<'a> LocalEntries<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: Some(0) }
    }

    fn parse_at(&self, pos: usize) -> Option<(LocalEntry<'a>, Option<usize>)> {
        let header = read_bytes(self.data, pos, LOCAL_HEADER_LEN).ok()?;
        if !signature_matches(header, ZIP_SIGNATURE) {
            return None;
        }

        let flags = read_u16_le(header, 6).ok()?;
        let method = read_u16_le(header, 8).ok()?;
        let compressed_size = read_u32_le(header, 18).ok()? as usize;
        let name_len = read_u16_le(header, 26).ok()? as usize;
        let extra_len = read_u16_le(header, 28).ok()? as usize;

        let name = read_bytes(self.data, pos + LOCAL_HEADER_LEN, name_len).ok()?;
        let extra_start = pos + LOCAL_HEADER_LEN + name_len;
        let extra = read_bytes(self.data, extra_start, extra_len).ok()?;
        let data_start = extra_start + extra_len;
        let rest = self.data.get(data_start..).unwrap_or_default();

        let size_known = flags & FLAG_DATA_DESCRIPTOR == 0;
        let (data, next) = if size_known {
            let visible = compressed_size.min(rest.len());
            let next = data_start.checked_add(compressed_size);
            (&rest[..visible], next)
        } else {
            match find_pattern(rest, ZIP_SIGNATURE) {
                Some(offset) => (&rest[..offset], Some(data_start + offset)),
                None => (rest, None),
            }
        };

        let entry = LocalEntry {
            name,
            extra,
            method,
            data,
        };
        Some((entry, next))
    }
}

impl<'a> Iterator for LocalEntries<'a> {
    type Item = LocalEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos.take()?;
        let (entry, next) = self.parse_at(pos)?;
        // Headers are at least LOCAL_HEADER_LEN bytes, so `next` always advances.
        self.pos = next.filter(|&next| next < self.data.len());
        Some(entry)
    }
}

/// Walk the local file headers of a prefix.
#[inline]
pub fn entries(data: &[u8]) -> LocalEntries<'_> {
    LocalEntries::new(data)
}

/// Whether the prefix holds an entry with exactly this name.
pub fn has_entry(data: &[u8], name: &[u8]) -> bool {
    entries(data).any(|entry| entry.name == name)
}

/// Whether the first entry is a stored `mimetype` file with exactly this
/// content.
///
/// OpenDocument and EPUB containers put their MIME type there so that
/// magic-number sniffers can find it at a fixed position.
pub fn has_mimetype_entry(data: &[u8], mime: &[u8]) -> bool {
    entries(data).next().is_some_and(|first| {
        first.name == b"mimetype"
            && first.is_stored()
            && first.data.trim_ascii_end() == mime
    })
}

/// Office Open XML application, decided by the first part directory seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OoxmlKind {
    Word,
    Excel,
    PowerPoint,
}

/// Classify an OOXML package.
///
/// The package must open with one of the OPC bookkeeping parts
/// (`[Content_Types].xml`, `_rels/.rels` or `docProps/`); after that the
/// first entry under `word/`, `xl/` or `ppt/` decides the application.
pub fn ooxml_kind(data: &[u8]) -> Option<OoxmlKind> {
    let mut iter = entries(data);
    let first = iter.next()?;
    if !is_opc_bookkeeping(first.name) {
        return None;
    }

    std::iter::once(first).chain(iter).find_map(|entry| {
        if entry.name.starts_with(b"word/") {
            Some(OoxmlKind::Word)
        } else if entry.name.starts_with(b"xl/") {
            Some(OoxmlKind::Excel)
        } else if entry.name.starts_with(b"ppt/") {
            Some(OoxmlKind::PowerPoint)
        } else {
            None
        }
    })
}

fn is_opc_bookkeeping(name: &[u8]) -> bool {
    name == b"[Content_Types].xml" || name == b"_rels/.rels" || name.starts_with(b"docProps/")
}

/// Word processing document.
pub fn is_docx(data: &[u8]) -> bool {
    ooxml_kind(data) == Some(OoxmlKind::Word)
}

/// Spreadsheet with XML parts.
pub fn is_xlsx(data: &[u8]) -> bool {
    ooxml_kind(data) == Some(OoxmlKind::Excel)
}

/// Spreadsheet whose workbook part is binary (`xl/workbook.bin`).
pub fn is_xlsb(data: &[u8]) -> bool {
    is_xlsx(data) && has_entry(data, b"xl/workbook.bin")
}

/// Presentation.
pub fn is_pptx(data: &[u8]) -> bool {
    ooxml_kind(data) == Some(OoxmlKind::PowerPoint)
}

pub fn is_odt(data: &[u8]) -> bool {
    has_mimetype_entry(data, b"application/vnd.oasis.opendocument.text")
}

pub fn is_ott(data: &[u8]) -> bool {
    has_mimetype_entry(data, b"application/vnd.oasis.opendocument.text-template")
}

pub fn is_ods(data: &[u8]) -> bool {
    has_mimetype_entry(data, b"application/vnd.oasis.opendocument.spreadsheet")
}

pub fn is_odp(data: &[u8]) -> bool {
    has_mimetype_entry(data, b"application/vnd.oasis.opendocument.presentation")
}

pub fn is_odg(data: &[u8]) -> bool {
    has_mimetype_entry(data, b"application/vnd.oasis.opendocument.graphics")
}

pub fn is_epub(data: &[u8]) -> bool {
    has_mimetype_entry(data, b"application/epub+zip")
}

/// Java archive: a manifest entry, or a first entry tagged with the
/// `0xCAFE` extra block that `jar` writes.
pub fn is_jar(data: &[u8]) -> bool {
    let mut iter = entries(data);
    let Some(first) = iter.next() else {
        return false;
    };
    if first.has_extra_id(JAR_MAGIC_EXTRA_ID) {
        return true;
    }
    std::iter::once(first)
        .chain(iter)
        .any(|entry| entry.name == b"META-INF/MANIFEST.MF")
}

/// Android package: carries a binary `AndroidManifest.xml`.
pub fn is_apk(data: &[u8]) -> bool {
    has_entry(data, b"AndroidManifest.xml")
}

/// iWork application, decided by the IWA parts visible in the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IworkKind {
    Pages,
    Keynote,
    Numbers,
}

/// Classify a zipped iWork document.
///
/// Slide archives mean Keynote. Otherwise a calculation engine or table
/// archives mean Numbers. A plain `Index/Document.iwa` is Pages.
pub fn iwork_kind(data: &[u8]) -> Option<IworkKind> {
    let mut has_iwa = false;
    let mut has_document = false;
    let mut has_slides = false;
    let mut has_tables = false;

    for entry in entries(data) {
        let name = entry.name;
        if !name.ends_with(b".iwa") {
            continue;
        }
        has_iwa = true;
        if name == b"Index/Document.iwa" {
            has_document = true;
        } else if name.starts_with(b"Index/Slide") || name.starts_with(b"Index/TemplateSlide") {
            has_slides = true;
        } else if name == b"Index/CalculationEngine.iwa" || name.starts_with(b"Index/Tables/") {
            has_tables = true;
        }
    }

    if !has_iwa {
        return None;
    }
    if has_slides {
        Some(IworkKind::Keynote)
    } else if has_tables {
        Some(IworkKind::Numbers)
    } else if has_document {
        Some(IworkKind::Pages)
    } else {
        None
    }
}

pub fn is_keynote(data: &[u8]) -> bool {
    iwork_kind(data) == Some(IworkKind::Keynote)
}

pub fn is_numbers(data: &[u8]) -> bool {
    iwork_kind(data) == Some(IworkKind::Numbers)
}

pub fn is_pages(data: &[u8]) -> bool {
    iwork_kind(data) == Some(IworkKind::Pages)
}

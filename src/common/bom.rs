//! Byte order marks.
//!
//! A leading BOM is the strongest signal that a prefix is text, whatever
//! bytes follow it, so the text matcher consults this first.

/// Unicode encoding announced by a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

// Longest first: the UTF-32 LE mark begins with the UTF-16 LE one.
const MARKS: [(BomKind, &[u8]); 5] = [
    (BomKind::Utf32Le, &[0xFF, 0xFE, 0x00, 0x00]),
    (BomKind::Utf32Be, &[0x00, 0x00, 0xFE, 0xFF]),
    (BomKind::Utf8, &[0xEF, 0xBB, 0xBF]),
    (BomKind::Utf16Le, &[0xFF, 0xFE]),
    (BomKind::Utf16Be, &[0xFE, 0xFF]),
];

impl BomKind {
    /// The mark as it appears on the wire.
    pub fn mark(self) -> &'static [u8] {
        MARKS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, mark)| *mark)
            .unwrap_or_default()
    }

    /// WHATWG label of the encoding.
    pub const fn label(self) -> &'static str {
        match self {
            BomKind::Utf8 => "utf-8",
            BomKind::Utf16Le => "utf-16le",
            BomKind::Utf16Be => "utf-16be",
            BomKind::Utf32Le => "utf-32le",
            BomKind::Utf32Be => "utf-32be",
        }
    }
}

/// Byte order mark at the start of `data`, if any.
pub fn detect_bom(data: &[u8]) -> Option<BomKind> {
    MARKS
        .iter()
        .find(|(_, mark)| data.starts_with(mark))
        .map(|(kind, _)| *kind)
}

/// `data` without a leading UTF-8 mark.
#[inline]
pub fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(BomKind::Utf8.mark()).unwrap_or(data)
}

//! Text and markup detection.
//!
//! Text is what is left once the binary formats have had their turn, so
//! `text/plain` sits last among the root's children. Its markup children
//! only look at how the document opens; they do not parse it.

use aho_corasick::{AhoCorasick, Anchored, Input, MatchKind, StartKind};
use once_cell::sync::Lazy;

use crate::common::bom::{detect_bom, strip_utf8_bom};
use crate::magic::find_pattern;

/// Bytes that never occur in text (C0 controls other than TAB, LF, FF, CR
/// and ESC).
const BINARY_BYTES: [bool; 256] = {
    let mut table = [false; 256];
    let mut b = 0;
    while b < 0x20 {
        table[b] = !matches!(b, 0x09 | 0x0A | 0x0C | 0x0D | 0x1B);
        b += 1;
    }
    table
};

/// Opening tags that mark a document as HTML. Each must be followed by a
/// space or `>`.
const HTML_TAGS: &[&str] = &[
    "<!DOCTYPE HTML",
    "<HTML",
    "<HEAD",
    "<SCRIPT",
    "<IFRAME",
    "<H1",
    "<DIV",
    "<FONT",
    "<TABLE",
    "<A",
    "<STYLE",
    "<TITLE",
    "<B",
    "<BODY",
    "<BR",
    "<P",
    "<!--",
];

// Anchored, case-insensitive, longest tag wins (`<BODY` over `<B`).
static HTML_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .start_kind(StartKind::Anchored)
        .build(HTML_TAGS)
        .expect("Failed to build HTML tag matcher")
});

/// Skip a UTF-8 BOM and leading ASCII whitespace.
#[inline]
fn document_start(data: &[u8]) -> &[u8] {
    strip_utf8_bom(data).trim_ascii_start()
}

/// Whether the prefix looks like text.
///
/// A byte order mark settles it. Otherwise any byte from the binary set
/// rules text out.
pub fn is_text(data: &[u8]) -> bool {
    if detect_bom(data).is_some() {
        return true;
    }
    !data.iter().any(|&b| BINARY_BYTES[b as usize])
}

/// HTML, recognised by its first tag.
pub fn is_html(data: &[u8]) -> bool {
    let start = document_start(data);
    let input = Input::new(start).anchored(Anchored::Yes);
    HTML_MATCHER
        .find(input)
        .and_then(|m| start.get(m.end()))
        .is_some_and(|&next| next == b' ' || next == b'>')
}

/// XML, recognised by its declaration.
pub fn is_xml(data: &[u8]) -> bool {
    document_start(data)
        .get(..5)
        .is_some_and(|decl| decl.eq_ignore_ascii_case(b"<?xml"))
}

/// Root element opening tag visible in the prefix.
fn has_element(data: &[u8], tag: &[u8]) -> bool {
    let mut rest = data;
    while let Some(pos) = find_pattern(rest, tag) {
        let after = &rest[pos + tag.len()..];
        match after.first() {
            Some(b' ' | b'>' | b'\t' | b'\n' | b'\r' | b'/') => return true,
            Some(_) => rest = after,
            None => return false,
        }
    }
    false
}

pub fn is_svg(data: &[u8]) -> bool {
    has_element(data, b"<svg")
}

pub fn is_rss(data: &[u8]) -> bool {
    has_element(data, b"<rss")
}

pub fn is_atom(data: &[u8]) -> bool {
    has_element(data, b"<feed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_binary() {
        assert!(is_text(b"hello, world\r\n\tindented\x0C"));
        assert!(is_text("naïve café".as_bytes()));
        assert!(is_text(b"\x1B[1mbold\x1B[0m"));
        assert!(!is_text(b"hello\x00world"));
        assert!(!is_text(b"\x01\x02\x03"));
        // UTF-16 text is full of NULs but carries a BOM.
        assert!(is_text(b"\xFF\xFEh\x00i\x00"));
    }

    #[test]
    fn test_html_tags() {
        assert!(is_html(b"<!DOCTYPE html>\n<html>"));
        assert!(is_html(b"  \n<HTML lang=\"en\">"));
        assert!(is_html(b"\xEF\xBB\xBF<body>"));
        assert!(is_html(b"<br>"));
        assert!(is_html(b"<!-- comment -->"));
        assert!(is_html(b"<p>text</p>"));
        assert!(!is_html(b"<abbr>"));
        assert!(!is_html(b"<html"));
        assert!(!is_html(b"<?xml version=\"1.0\"?>"));
        assert!(!is_html(b"text <html>"));
    }

    #[test]
    fn test_xml_family() {
        let svg = b"<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>";
        assert!(is_xml(svg));
        assert!(is_svg(svg));
        assert!(!is_rss(svg));

        assert!(is_xml(b"\xEF\xBB\xBF  <?XML version='1.0'?>"));
        assert!(is_rss(b"<?xml version=\"1.0\"?><rss version=\"2.0\">"));
        assert!(is_atom(b"<?xml version=\"1.0\"?><feed xmlns=\"http://www.w3.org/2005/Atom\">"));
        assert!(!is_svg(b"<?xml version=\"1.0\"?><svgish/>"));
        assert!(!is_xml(b"<svg/>"));
    }
}

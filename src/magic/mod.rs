//! Byte-pattern predicates ("magic numbers").
//!
//! A [`Matcher`] answers one question about a byte prefix: does it look like
//! format X. Matchers are pure and total: a prefix that is too short, or a
//! structure that is truncated or malformed, is simply "no match". They never
//! look past the slice they are handed, which the engine has already cut down
//! to the read limit.
//!
//! Most formats are recognised declaratively by a fixed [`Signature`] or a
//! [`MaskedSignature`]. Formats that share a container (ZIP, OLE2,
//! ISO-BMFF, EBML, ELF) use [`Matcher::Container`] functions from the
//! submodules, which run a bounded parse of the same prefix.

pub mod exec;
pub mod media;
pub mod ole2;
pub mod text;
pub mod zip;

/// Container-aware predicate over a byte prefix.
pub type MatchFn = fn(&[u8]) -> bool;

/// Literal bytes expected at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    offset: usize,
    bytes: &'static [u8],
}

impl Signature {
    /// Signature at the very start of the input.
    #[inline]
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self { offset: 0, bytes }
    }

    /// Signature starting `offset` bytes into the input.
    #[inline]
    pub const fn at(offset: usize, bytes: &'static [u8]) -> Self {
        Self { offset, bytes }
    }

    /// Test the signature against `data`.
    #[inline]
    pub fn test(&self, data: &[u8]) -> bool {
        data.get(self.offset..)
            .is_some_and(|rest| signature_matches(rest, self.bytes))
    }
}

/// Bytes compared under a bitmask at a fixed offset.
///
/// Input byte `b` matches pattern byte `p` under mask byte `m` when
/// `b & m == p & m`. Pattern and mask must be the same length; a mismatch in
/// length never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedSignature {
    offset: usize,
    pattern: &'static [u8],
    mask: &'static [u8],
}

impl MaskedSignature {
    #[inline]
    pub const fn new(offset: usize, pattern: &'static [u8], mask: &'static [u8]) -> Self {
        Self {
            offset,
            pattern,
            mask,
        }
    }

    pub fn test(&self, data: &[u8]) -> bool {
        if self.pattern.len() != self.mask.len() {
            return false;
        }
        let Some(window) = data.get(self.offset..)
            .and_then(|rest| rest.get(..self.pattern.len()))
        else {
            return false;
        };

        window
            .iter()
            .zip(self.pattern.iter().zip(self.mask))
            .all(|(&b, (&p, &m))| b & m == p & m)
    }
}

/// Predicate attached to a type node.
///
/// Every variant is `Copy` and can be built in a `const` context, so the
/// built-in catalogue is plain data.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Accepts every input. Used by the root.
    Always,
    /// Fixed bytes at a fixed offset.
    Signature(Signature),
    /// Bytes under a bitmask at a fixed offset.
    Masked(MaskedSignature),
    /// Accepts when any of the listed matchers accepts.
    Any(&'static [Matcher]),
    /// Bounded parse of the prefix.
    Container(MatchFn),
}

impl Matcher {
    /// Literal bytes at offset zero.
    #[inline]
    pub const fn prefix(bytes: &'static [u8]) -> Self {
        Matcher::Signature(Signature::new(bytes))
    }

    /// Literal bytes at `offset`.
    #[inline]
    pub const fn at(offset: usize, bytes: &'static [u8]) -> Self {
        Matcher::Signature(Signature::at(offset, bytes))
    }

    /// Masked bytes at `offset`.
    #[inline]
    pub const fn masked(offset: usize, pattern: &'static [u8], mask: &'static [u8]) -> Self {
        Matcher::Masked(MaskedSignature::new(offset, pattern, mask))
    }

    /// Container-aware function.
    #[inline]
    pub const fn container(f: MatchFn) -> Self {
        Matcher::Container(f)
    }

    /// Evaluate the predicate against a prefix.
    pub fn test(&self, data: &[u8]) -> bool {
        match self {
            Matcher::Always => true,
            Matcher::Signature(signature) => signature.test(data),
            Matcher::Masked(masked) => masked.test(data),
            Matcher::Any(matchers) => matchers.iter().any(|m| m.test(data)),
            Matcher::Container(f) => f(data),
        }
    }

    /// Whether this matcher accepts every input.
    #[inline]
    pub const fn is_total(&self) -> bool {
        matches!(self, Matcher::Always)
    }
}

/// Check if a byte slice starts with a given signature.
///
/// # Examples
///
/// ```rust
/// use longan::magic::signature_matches;
///
/// let ole2_sig = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// let data = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00, 0x00];
///
/// assert!(signature_matches(data, ole2_sig));
/// assert!(!signature_matches(&data[..4], ole2_sig));
/// ```
#[inline]
pub fn signature_matches(data: &[u8], signature: &[u8]) -> bool {
    data.len() >= signature.len() && &data[..signature.len()] == signature
}

/// Position of the first occurrence of `needle` in `haystack`.
///
/// # Examples
///
/// ```rust
/// use longan::magic::find_pattern;
///
/// let content = b"application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// assert!(find_pattern(content, b"wordprocessingml").is_some());
/// assert!(find_pattern(content, b"").is_none());
/// ```
#[inline]
pub fn find_pattern(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    memchr::memmem::find(haystack, needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIF: Matcher = Matcher::Any(&[Matcher::prefix(b"GIF87a"), Matcher::prefix(b"GIF89a")]);
    const WEBP: Matcher = Matcher::masked(
        0,
        b"RIFF\x00\x00\x00\x00WEBP",
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
    );

    fn starts_with_two_zeros(data: &[u8]) -> bool {
        data.starts_with(&[0, 0])
    }

    #[test]
    fn test_signature_offsets() {
        let tar = Matcher::at(257, b"ustar");
        let mut data = vec![0u8; 300];
        assert!(!tar.test(&data));
        data[257..262].copy_from_slice(b"ustar");
        assert!(tar.test(&data));
        assert!(!tar.test(&data[..260]));
        assert!(!tar.test(&[]));
    }

    #[test]
    fn test_masked_ignores_masked_bits() {
        assert!(WEBP.test(b"RIFF\x10\x20\x30\x40WEBPVP8 "));
        assert!(!WEBP.test(b"RIFF\x10\x20\x30\x40WAVEfmt "));
        assert!(!WEBP.test(b"RIFF\x10\x20"));

        let broken = Matcher::masked(0, b"AB", b"\xFF");
        assert!(!broken.test(b"AB"));
    }

    #[test]
    fn test_any_and_container() {
        assert!(GIF.test(b"GIF89a\x01\x00"));
        assert!(GIF.test(b"GIF87a"));
        assert!(!GIF.test(b"GIF88a"));

        let container = Matcher::container(starts_with_two_zeros);
        assert!(container.test(&[0, 0, 1]));
        assert!(!container.test(&[0]));
    }

    #[test]
    fn test_always_is_total() {
        assert!(Matcher::Always.test(&[]));
        assert!(Matcher::Always.is_total());
        assert!(!GIF.is_total());
    }
}

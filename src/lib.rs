//! Longan - MIME type detection from magic numbers
//!
//! Types are arranged in a tree rooted at `application/octet-stream`. Each
//! node carries a matcher over the first few kilobytes of input, and
//! detection walks from the root into the first child whose matcher
//! accepts, until no child does. The node reached is the most specific type
//! the bytes support, and its ancestors are the more generic types it also
//! is (an XLSX file is also `application/zip`).
//!
//! # Features
//!
//! - **Bounded input**: never looks past the first [`READ_LIMIT`] bytes
//! - **Container aware**: tells OOXML, OpenDocument, EPUB, JAR and iWork
//!   apart inside ZIP, and Word, Excel, PowerPoint and MSI inside OLE2
//! - **Hierarchical results**: walk from a specific type to its parents
//! - **Extensible**: add your own types to the built-in tree
//!
//! # Example - Detecting a buffer
//!
//! ```rust
//! let mime = longan::detect(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR");
//! assert_eq!(mime.name(), "image/png");
//! assert_eq!(mime.extension(), Some("png"));
//! ```
//!
//! # Example - Detecting a file
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mime = longan::detect_file("report.xlsx")?;
//! if mime.ancestors().any(|m| m.is("application/zip")) {
//!     println!("{mime} is a zip archive underneath");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Errors only concern getting hold of the bytes. They still carry a usable
//! type, the root:
//!
//! ```rust
//! let mime = longan::detect_file("/no/such/file").unwrap_or_else(|err| err.fallback());
//! assert_eq!(mime.name(), longan::OCTET_STREAM);
//! ```
//!
//! # Example - Extending the catalogue
//!
//! ```rust
//! use longan::magic::Matcher;
//! use longan::{Detector, MimeDef, MimeTreeBuilder};
//!
//! let mut builder = MimeTreeBuilder::builtin();
//! let zip = builder.find("application/zip").expect("zip is built in");
//! builder.add(zip, MimeDef::new("application/x-acme-bundle", Matcher::at(30, b"acme.manifest")));
//! let tree = builder.build()?;
//!
//! let detector = Detector::for_tree(&tree);
//! # Ok::<(), longan::Error>(())
//! ```

/// Bounded binary reads, byte order marks and error types.
pub mod common;

/// Detector configuration and the reader/file front door.
pub mod detection;

/// Signature primitives and container-aware matchers.
pub mod magic;

/// The type tree, its builder and the detected type handle.
pub mod tree;

mod catalogue;

use std::io::Read;
use std::path::Path;

pub use common::{DetectError, Error, Result};
pub use detection::{Detector, DetectorConfig};
pub use tree::{EMPTY, MimeDef, MimeTree, MimeTreeBuilder, MimeType, OCTET_STREAM};

/// Number of leading bytes read and inspected by default.
pub const READ_LIMIT: usize = 3072;

/// The built-in type tree.
#[inline]
pub fn builtin() -> &'static MimeTree {
    catalogue::builtin()
}

/// Detect the type of an in-memory buffer with the built-in tree.
///
/// Never fails. Empty input yields `inode/x-empty`; unrecognised input
/// yields `application/octet-stream`.
#[inline]
pub fn detect(data: &[u8]) -> MimeType<'static> {
    builtin().detect(data)
}

/// Detect the type of the first [`READ_LIMIT`] bytes of `reader`.
///
/// See [`Detector::detect_reader`].
pub fn detect_reader<R: Read>(
    reader: R,
) -> std::result::Result<MimeType<'static>, DetectError<'static>> {
    Detector::new().detect_reader(reader)
}

/// Detect the type of the file at `path`.
///
/// See [`Detector::detect_file`].
pub fn detect_file<P: AsRef<Path>>(
    path: P,
) -> std::result::Result<MimeType<'static>, DetectError<'static>> {
    Detector::new().detect_file(path)
}

/// Find a built-in type by canonical name or alias.
///
/// ```rust
/// let xls = longan::lookup("application/msexcel").unwrap();
/// assert_eq!(xls.name(), "application/vnd.ms-excel");
/// assert_eq!(xls.parent().unwrap().name(), "application/x-ole-storage");
/// ```
#[inline]
pub fn lookup(name: &str) -> Option<MimeType<'static>> {
    builtin().lookup(name)
}

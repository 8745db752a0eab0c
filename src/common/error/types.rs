//! Unified error types for Longan.
use std::path::PathBuf;

use thiserror::Error;

use crate::tree::MimeType;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input failed for a reason other than end of input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The named input could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two nodes share a canonical name
    #[error("Duplicate MIME type: {0}")]
    DuplicateType(String),

    /// A canonical name is empty, lacks a `/`, or carries parameters
    #[error("Invalid MIME type name: {0:?}")]
    InvalidName(String),

    /// Structural problem in a tree under construction
    #[error("Invalid type tree: {0}")]
    InvalidTree(String),

    /// Rejected detector configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to acquire input bytes, paired with the fallback type.
///
/// The front door never leaves a caller without a usable type: when opening
/// or reading fails, the root type of the tree that was asked is returned
/// through [`DetectError::fallback`].
///
/// ```no_run
/// let mime = longan::detect_file("missing.bin").unwrap_or_else(|err| err.fallback());
/// assert_eq!(mime.name(), longan::OCTET_STREAM);
/// ```
#[derive(Error, Debug)]
#[error("detection input unavailable")]
pub struct DetectError<'t> {
    fallback: MimeType<'t>,
    #[source]
    source: Error,
}

impl<'t> DetectError<'t> {
    pub(crate) fn new(fallback: MimeType<'t>, source: impl Into<Error>) -> Self {
        Self {
            fallback,
            source: source.into(),
        }
    }

    /// The root type of the tree detection was attempted against.
    #[inline]
    pub fn fallback(&self) -> MimeType<'t> {
        self.fallback
    }

    /// The underlying acquisition error.
    #[inline]
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// Split into the fallback type and the underlying error.
    #[inline]
    pub fn into_parts(self) -> (MimeType<'t>, Error) {
        (self.fallback, self.source)
    }
}

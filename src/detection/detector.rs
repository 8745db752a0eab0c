//! Bounded reads in front of the tree walk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::DetectorConfig;
use crate::common::{DetectError, Error, Result};
use crate::tree::{MimeTree, MimeType};

/// A tree paired with a read limit.
///
/// The crate-level functions use `Detector::new()`; build one yourself to
/// run a custom tree or a different limit.
///
/// # Examples
///
/// ```rust
/// use longan::{Detector, DetectorConfig, MimeTreeBuilder};
///
/// let tree = MimeTreeBuilder::builtin().build()?;
/// let detector = Detector::with_config(&tree, DetectorConfig::new().with_read_limit(8))?;
///
/// let mime = detector.detect(b"%PDF-1.7\n");
/// assert_eq!(mime.name(), "application/pdf");
/// # Ok::<(), longan::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Detector<'t> {
    tree: &'t MimeTree,
    config: DetectorConfig,
}

impl Default for Detector<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector<'static> {
    /// Detector over the built-in tree with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self {
            tree: crate::catalogue::builtin(),
            config: DetectorConfig::default(),
        }
    }
}

impl<'t> Detector<'t> {
    /// Detector over `tree` with the default configuration.
    #[inline]
    pub fn for_tree(tree: &'t MimeTree) -> Self {
        Self {
            tree,
            config: DetectorConfig::default(),
        }
    }

    /// Detector over `tree` with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    pub fn with_config(tree: &'t MimeTree, config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { tree, config })
    }

    #[inline]
    pub fn tree(&self) -> &'t MimeTree {
        self.tree
    }

    #[inline]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect the type of an in-memory buffer.
    ///
    /// Only the first `read_limit` bytes are inspected. This never fails:
    /// empty input gives `inode/x-empty`, and anything unrecognised gives
    /// the root.
    #[inline]
    pub fn detect(&self, data: &[u8]) -> MimeType<'t> {
        self.tree.detect_with_limit(data, self.config.read_limit)
    }

    /// Read at most `read_limit` bytes from `reader` and detect their type.
    ///
    /// Reaching the end of input early is not an error; fewer bytes simply
    /// mean less to go on, and no bytes at all mean `inode/x-empty`.
    /// Interrupted reads are retried.
    ///
    /// # Errors
    ///
    /// Any other read failure returns a [`DetectError`] wrapping
    /// [`Error::Io`], whose [`fallback`](DetectError::fallback) is the root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::io::Cursor;
    ///
    /// let detector = longan::Detector::new();
    /// let mime = detector.detect_reader(Cursor::new(b"GIF89a...."))?;
    /// assert_eq!(mime.name(), "image/gif");
    /// # Ok::<(), longan::DetectError<'static>>(())
    /// ```
    pub fn detect_reader<R: Read>(
        &self,
        reader: R,
    ) -> std::result::Result<MimeType<'t>, DetectError<'t>> {
        let limit = self.config.read_limit;
        // Past the default limit the buffer grows with the input.
        let mut buffer = Vec::with_capacity(limit.min(crate::READ_LIMIT));
        if let Err(err) = reader.take(limit as u64).read_to_end(&mut buffer) {
            tracing::debug!(error = %err, read = buffer.len(), "read failed before detection");
            return Err(DetectError::new(self.tree.root(), err));
        }
        Ok(self.detect(&buffer))
    }

    /// Open `path`, read at most `read_limit` bytes and detect their type.
    ///
    /// The file is closed before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// An open failure returns [`Error::Open`] and nothing is read. Read
    /// failures are reported as by [`detect_reader`](Self::detect_reader).
    /// Either way the error carries the root as its fallback.
    pub fn detect_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> std::result::Result<MimeType<'t>, DetectError<'t>> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %source,
                    "failed to open file for detection"
                );
                return Err(DetectError::new(
                    self.tree.root(),
                    Error::Open {
                        path: path.to_path_buf(),
                        source,
                    },
                ));
            },
        };
        self.detect_reader(file)
    }
}

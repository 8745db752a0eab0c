//! Detector configuration.

use crate::common::{Error, Result};

/// Options for a [`Detector`](super::Detector).
///
/// # Examples
///
/// ```rust
/// use longan::DetectorConfig;
///
/// // Defaults
/// let config = DetectorConfig::default();
/// assert_eq!(config.read_limit, longan::READ_LIMIT);
///
/// // Or customize
/// let config = DetectorConfig::new().with_read_limit(512);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Maximum number of leading bytes read and inspected
    pub read_limit: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            read_limit: crate::READ_LIMIT,
        }
    }
}

impl DetectorConfig {
    /// Create a new `DetectorConfig` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of leading bytes inspected.
    ///
    /// Signatures that lie past this limit can no longer be seen, so a
    /// smaller limit trades precision for less I/O. Any larger limit,
    /// `usize::MAX` included, is accepted; reads stop at the end of input.
    #[inline]
    pub fn with_read_limit(mut self, read_limit: usize) -> Self {
        self.read_limit = read_limit;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the read limit is zero, since
    /// every non-empty input would then look empty.
    pub fn validate(&self) -> Result<()> {
        if self.read_limit == 0 {
            return Err(Error::InvalidConfig("read_limit must be greater than zero".to_string()));
        }
        Ok(())
    }
}

//! Unified error types for Longan.
//!
//! Detection itself never fails. Errors only describe acquiring the input
//! bytes (opening or reading a source) or building a malformed type tree.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{DetectError, Error, Result};

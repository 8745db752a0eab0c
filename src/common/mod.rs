//! Common types and utilities shared by the matchers and the front door.
//!
//! Bounds-checked binary reads and byte order mark handling live here, along
//! with the crate-wide error types.

// Submodule declarations
pub mod binary;
pub mod bom;
pub mod error;

// Re-exports for convenience
pub use error::{DetectError, Error, Result};

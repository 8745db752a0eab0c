//! Detection front door.
//!
//! [`Detector`] bounds how much input is taken from a buffer, a reader or a
//! file, then hands the prefix to the tree walk. Only acquiring the bytes
//! can fail; classification itself always yields a type.

mod config;
mod detector;

pub use config::DetectorConfig;
pub use detector::Detector;

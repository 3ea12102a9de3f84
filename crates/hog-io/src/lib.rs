#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Reading, writing and converting grayscale images.
///
/// See [`functional::read_image_gray_resized`] to load an image at the
/// detection window size.
pub mod functional;

/// JSON serialization of descriptors and intermediate grids.
pub mod json;

/// An observer that dumps the pipeline artifacts to disk.
pub mod observer;

pub use crate::error::IoError;
pub use crate::observer::JsonDumpObserver;

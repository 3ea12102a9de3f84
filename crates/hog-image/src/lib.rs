#![deny(missing_docs)]
//! Image types used at the boundaries of the hog crates.

/// image representation for feature extraction.
pub mod image;

/// Error types for the image module.
pub mod error;

/// operations between images.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

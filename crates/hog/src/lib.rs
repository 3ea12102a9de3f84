#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use hog_image as image;

#[doc(inline)]
pub use hog_descriptor as descriptor;

#[doc(inline)]
pub use hog_io as io;

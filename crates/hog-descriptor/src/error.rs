use hog_image::{ImageError, ImageSize};

use crate::parallel::ParallelError;

/// Errors that can occur while computing a HOG descriptor.
#[derive(Debug, thiserror::Error)]
pub enum HogError {
    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error raised by the execution strategy.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),

    /// The number of orientation bins must be positive.
    #[error("number of orientation bins must be > 0, got {0}")]
    InvalidBinCount(usize),

    /// The cell size must be positive in both dimensions.
    #[error("cell size must be > 0 in both dimensions, got {0}")]
    InvalidCellSize(ImageSize),

    /// The block size must be positive in both dimensions.
    #[error("block size must be > 0 in both dimensions, got {0}")]
    InvalidBlockSize(ImageSize),

    /// The block stride must be positive.
    #[error("block stride must be > 0, got {0}")]
    InvalidBlockStride(usize),

    /// The normalization epsilon must be finite and strictly positive.
    #[error("normalization epsilon must be finite and > 0, got {0}")]
    InvalidEpsilon(f64),

    /// The input image has no pixels.
    #[error("the input image is empty: {0}")]
    EmptyImage(ImageSize),

    /// The image is not an exact multiple of the cell size.
    #[error("image size {image} is not divisible by the cell size {cell}")]
    ImageNotDivisible {
        /// size of the input image.
        image: ImageSize,
        /// size of a cell in pixels.
        cell: ImageSize,
    },

    /// The block does not fit in the cell grid.
    #[error("block size {block} does not fit in a cell grid of {cells_x}x{cells_y}")]
    BlockLargerThanGrid {
        /// size of a block in cells.
        block: ImageSize,
        /// number of cells along x.
        cells_x: usize,
        /// number of cells along y.
        cells_y: usize,
    },

    /// The block stride does not land the last block on the grid border.
    #[error("block stride {stride} does not tile {cells} cells with blocks of {block}")]
    BlockStrideMismatch {
        /// block stride in cells.
        stride: usize,
        /// number of cells along the offending axis.
        cells: usize,
        /// block length along the offending axis.
        block: usize,
    },

    /// The descriptor holds more values than can be addressed.
    #[error("descriptor with {bin_count} bins over {cells_x}x{cells_y} cells is too large")]
    DescriptorTooLarge {
        /// number of orientation bins.
        bin_count: usize,
        /// number of cells along x.
        cells_x: usize,
        /// number of cells along y.
        cells_y: usize,
    },

    /// A histogram buffer does not have the expected length.
    #[error("histogram length ({0}) does not match the expected length ({1})")]
    HistogramLengthMismatch(usize, usize),

    /// An observer failed while handling an intermediate artifact.
    #[error("observer failed: {0}")]
    Observer(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HogError {
    /// Wrap an arbitrary error raised by an observer.
    pub fn observer<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        HogError::Observer(err.into())
    }
}

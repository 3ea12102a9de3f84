use hog_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::{error::HogError, parallel::ExecutionStrategy};

/// Number of fractional digits kept for magnitudes, angles and cell histograms.
pub const ROUNDING_DECIMALS: i32 = 9;

/// How the gradient orientation is mapped to an angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleConvention {
    /// `|atan(gy / gx)|`, folded into `[0, 90]`; `0` when `gx == 0`.
    #[default]
    Folded,
    /// `atan2(gy, gx)` mapped into `[0, 180)`.
    Unsigned,
}

/// Configuration of the HOG descriptor.
///
/// The configuration is an immutable value injected into every stage of the
/// pipeline. Use the `with_*` methods to derive modified copies.
///
/// # Examples
///
/// ```
/// use hog_descriptor::{AngleConvention, HogConfig};
///
/// let config = HogConfig::new()
///     .with_bin_count(12)
///     .with_angle_convention(AngleConvention::Unsigned);
///
/// assert_eq!(config.bin_count, 12);
/// assert_eq!(config.cell_size.width, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HogConfig {
    /// Number of orientation bins spanning `[0, 180)`.
    pub bin_count: usize,
    /// Size of a cell in pixels.
    pub cell_size: ImageSize,
    /// Size of a block in cells.
    pub block_size: ImageSize,
    /// Step between consecutive blocks in cells, in both directions.
    pub block_stride: usize,
    /// Constant added to the L2 norm of a block before dividing.
    pub epsilon: f64,
    /// Angle convention used to compute orientations.
    pub angle: AngleConvention,
    /// How the per-row units are executed.
    #[serde(skip)]
    pub strategy: ExecutionStrategy,
}

impl Default for HogConfig {
    fn default() -> Self {
        Self {
            bin_count: 9,
            cell_size: ImageSize::new(8, 8),
            block_size: ImageSize::new(2, 2),
            block_stride: 1,
            epsilon: 1e-5,
            angle: AngleConvention::Folded,
            strategy: ExecutionStrategy::Serial,
        }
    }
}

impl HogConfig {
    /// Create the default configuration: 9 bins, 8x8 cells, 2x2 blocks, stride 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of orientation bins.
    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    /// Set the cell size in pixels.
    pub fn with_cell_size(mut self, cell_size: ImageSize) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the block size in cells.
    pub fn with_block_size(mut self, block_size: ImageSize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the block stride in cells.
    pub fn with_block_stride(mut self, block_stride: usize) -> Self {
        self.block_stride = block_stride;
        self
    }

    /// Set the normalization epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the angle convention.
    pub fn with_angle_convention(mut self, angle: AngleConvention) -> Self {
        self.angle = angle;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Width of an orientation bin in degrees.
    pub fn step_size(&self) -> f64 {
        180.0 / self.bin_count as f64
    }

    /// Validate the parts of the configuration that do not depend on the image size.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero bin count, an empty cell or block, a zero
    /// stride, a non positive epsilon or an invalid execution strategy.
    pub fn validate(&self) -> Result<(), HogError> {
        if self.bin_count == 0 {
            return Err(HogError::InvalidBinCount(self.bin_count));
        }
        if self.cell_size.is_empty() {
            return Err(HogError::InvalidCellSize(self.cell_size));
        }
        if self.block_size.is_empty() {
            return Err(HogError::InvalidBlockSize(self.block_size));
        }
        if self.block_stride == 0 {
            return Err(HogError::InvalidBlockStride(self.block_stride));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(HogError::InvalidEpsilon(self.epsilon));
        }
        self.strategy.validate()?;
        Ok(())
    }

    /// Derive the descriptor geometry for an image of the given size.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`HogConfig::validate`], fails when the image is
    /// empty, when it is not a multiple of the cell size, when the block does
    /// not fit in the cell grid, when the stride does not tile the grid, or
    /// when the histogram or feature lengths overflow a `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hog_descriptor::HogConfig;
    ///
    /// let layout = HogConfig::default().layout([64, 128].into()).unwrap();
    ///
    /// assert_eq!((layout.cells_x, layout.cells_y), (8, 16));
    /// assert_eq!((layout.blocks_x, layout.blocks_y), (7, 15));
    /// assert_eq!(layout.descriptor_len(), 3780);
    /// ```
    pub fn layout(&self, image_size: ImageSize) -> Result<HogLayout, HogError> {
        self.validate()?;

        if image_size.is_empty() {
            return Err(HogError::EmptyImage(image_size));
        }

        if image_size.width % self.cell_size.width != 0
            || image_size.height % self.cell_size.height != 0
        {
            return Err(HogError::ImageNotDivisible {
                image: image_size,
                cell: self.cell_size,
            });
        }

        let cells_x = image_size.width / self.cell_size.width;
        let cells_y = image_size.height / self.cell_size.height;

        if self.block_size.width > cells_x || self.block_size.height > cells_y {
            return Err(HogError::BlockLargerThanGrid {
                block: self.block_size,
                cells_x,
                cells_y,
            });
        }

        let blocks_x = num_blocks(cells_x, self.block_size.width, self.block_stride)?;
        let blocks_y = num_blocks(cells_y, self.block_size.height, self.block_stride)?;

        let layout = HogLayout {
            image_size,
            cell_size: self.cell_size,
            block_size: self.block_size,
            block_stride: self.block_stride,
            bin_count: self.bin_count,
            cells_x,
            cells_y,
            blocks_x,
            blocks_y,
        };
        check_lengths(&layout)?;

        Ok(layout)
    }
}

// the lengths derived from a layout must fit in a usize
fn check_lengths(layout: &HogLayout) -> Result<(), HogError> {
    let too_large = || HogError::DescriptorTooLarge {
        bin_count: layout.bin_count,
        cells_x: layout.cells_x,
        cells_y: layout.cells_y,
    };

    layout
        .cells_x
        .checked_mul(layout.cells_y)
        .and_then(|cells| cells.checked_mul(layout.bin_count))
        .ok_or_else(too_large)?;

    let block_len = layout
        .block_size
        .width
        .checked_mul(layout.block_size.height)
        .and_then(|cells| cells.checked_mul(layout.bin_count))
        .ok_or_else(too_large)?;

    layout
        .blocks_x
        .checked_mul(layout.blocks_y)
        .and_then(|blocks| blocks.checked_mul(block_len))
        .ok_or_else(too_large)?;

    Ok(())
}

// number of block positions along one axis of the cell grid
fn num_blocks(cells: usize, block: usize, stride: usize) -> Result<usize, HogError> {
    let span = cells - block;
    if span % stride != 0 {
        return Err(HogError::BlockStrideMismatch {
            stride,
            cells,
            block,
        });
    }
    Ok(span / stride + 1)
}

/// Geometry of a descriptor, derived from a [`HogConfig`] and an image size.
///
/// A layout built by [`HogConfig::layout`] guarantees that all the lengths
/// below fit in a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HogLayout {
    /// Size of the input image in pixels.
    pub image_size: ImageSize,
    /// Size of a cell in pixels.
    pub cell_size: ImageSize,
    /// Size of a block in cells.
    pub block_size: ImageSize,
    /// Step between blocks in cells.
    pub block_stride: usize,
    /// Number of orientation bins.
    pub bin_count: usize,
    /// Number of cells along x.
    pub cells_x: usize,
    /// Number of cells along y.
    pub cells_y: usize,
    /// Number of blocks along x.
    pub blocks_x: usize,
    /// Number of blocks along y.
    pub blocks_y: usize,
}

impl HogLayout {
    /// Width of an orientation bin in degrees.
    pub fn step_size(&self) -> f64 {
        180.0 / self.bin_count as f64
    }

    /// Number of values in a normalized block vector.
    pub fn block_len(&self) -> usize {
        self.block_size.area() * self.bin_count
    }

    /// Number of values in the whole cell histogram grid.
    pub fn histogram_len(&self) -> usize {
        self.cells_x * self.cells_y * self.bin_count
    }

    /// Total number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks_x * self.blocks_y
    }

    /// Length of the final feature vector.
    pub fn descriptor_len(&self) -> usize {
        self.num_blocks() * self.block_len()
    }
}

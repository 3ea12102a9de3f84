use serde::{Deserialize, Serialize};

use crate::{
    binning::OrientationBinner,
    config::{HogLayout, ROUNDING_DECIMALS},
    error::HogError,
    parallel::{self, ExecutionStrategy},
    polar::{round_decimals, PolarField},
};

/// Orientation histograms of the whole cell grid.
///
/// The histograms are stored row major over the cells, each one holding
/// `bin_count` contiguous values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellHistograms {
    cells_x: usize,
    cells_y: usize,
    bin_count: usize,
    data: Vec<f64>,
}

impl CellHistograms {
    /// Create a grid of histograms filled with zeros.
    ///
    /// The dimensions come from a [`HogLayout`], whose histogram length is
    /// known to fit in a `usize`.
    pub fn zeros(cells_x: usize, cells_y: usize, bin_count: usize) -> Self {
        Self {
            cells_x,
            cells_y,
            bin_count,
            data: vec![0.0; cells_x * cells_y * bin_count],
        }
    }

    /// Create a grid of histograms from existing values.
    ///
    /// # Errors
    ///
    /// Returns [`HogError::HistogramLengthMismatch`] if `data` does not hold
    /// `cells_x * cells_y * bin_count` values, or
    /// [`HogError::DescriptorTooLarge`] if that product overflows.
    pub fn from_vec(
        cells_x: usize,
        cells_y: usize,
        bin_count: usize,
        data: Vec<f64>,
    ) -> Result<Self, HogError> {
        let expected = cells_x
            .checked_mul(cells_y)
            .and_then(|cells| cells.checked_mul(bin_count))
            .ok_or(HogError::DescriptorTooLarge {
                bin_count,
                cells_x,
                cells_y,
            })?;
        if data.len() != expected {
            return Err(HogError::HistogramLengthMismatch(data.len(), expected));
        }
        Ok(Self {
            cells_x,
            cells_y,
            bin_count,
            data,
        })
    }

    /// Number of cells along x.
    pub fn cells_x(&self) -> usize {
        self.cells_x
    }

    /// Number of cells along y.
    pub fn cells_y(&self) -> usize {
        self.cells_y
    }

    /// Number of bins per histogram.
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Histogram of the cell at row `cy` and column `cx`.
    pub fn get(&self, cy: usize, cx: usize) -> Option<&[f64]> {
        if cy >= self.cells_y || cx >= self.cells_x {
            return None;
        }
        let start = (cy * self.cells_x + cx) * self.bin_count;
        self.data.get(start..start + self.bin_count)
    }

    /// All the histogram values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the grid and return the histogram values.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Accumulate the orientation histogram of every cell.
///
/// Each pixel of a cell splits its magnitude between the two bins bounding
/// its angle, see [`OrientationBinner::accumulate`]. Once the cell is complete
/// every bin is rounded to nine fractional digits.
///
/// # Arguments
///
/// * `polar` - The magnitudes and angles of the image.
/// * `layout` - The descriptor geometry.
/// * `binner` - The orientation binner, with `layout.bin_count` bins.
/// * `strategy` - How the rows of cells are processed.
pub fn compute_cell_histograms(
    polar: &PolarField,
    layout: &HogLayout,
    binner: &OrientationBinner,
    strategy: ExecutionStrategy,
) -> Result<CellHistograms, HogError> {
    if polar.magnitude.size() != layout.image_size || polar.angle.size() != layout.image_size {
        return Err(HogError::ImageError(hog_image::ImageError::InvalidImageSize(
            polar.magnitude.width(),
            polar.magnitude.height(),
            layout.image_size.width,
            layout.image_size.height,
        )));
    }
    if binner.bin_count() != layout.bin_count {
        return Err(HogError::HistogramLengthMismatch(
            binner.bin_count(),
            layout.bin_count,
        ));
    }

    let mut hist = CellHistograms::zeros(layout.cells_x, layout.cells_y, layout.bin_count);

    let magnitude = polar.magnitude.as_slice();
    let angle = polar.angle.as_slice();
    let cols = layout.image_size.width;
    let (cell_w, cell_h) = (layout.cell_size.width, layout.cell_size.height);
    let bin_count = layout.bin_count;

    parallel::for_each_row(
        strategy,
        &mut hist.data,
        layout.cells_x * bin_count,
        |cy, hist_row| {
            for (cx, cell) in hist_row.chunks_exact_mut(bin_count).enumerate() {
                for y in cy * cell_h..(cy + 1) * cell_h {
                    let offset = y * cols + cx * cell_w;
                    for idx in offset..offset + cell_w {
                        binner.add_vote(magnitude[idx], angle[idx], cell);
                    }
                }
                cell.iter_mut()
                    .for_each(|v| *v = round_decimals(*v, ROUNDING_DECIMALS));
            }
        },
    )?;

    Ok(hist)
}

use hog_image::{ops::ensure_same_size, Image};

use crate::{
    error::HogError,
    parallel::{self, ExecutionStrategy},
};

/// Horizontal and vertical intensity differences of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    /// Horizontal difference `right - left`.
    pub gx: Image<f64, 1>,
    /// Vertical difference `up - down`.
    pub gy: Image<f64, 1>,
}

impl GradientField {
    /// Compute the gradient field of a grayscale image.
    ///
    /// See [`spatial_gradient_centered`] for the boundary handling.
    pub fn compute(src: &Image<f32, 1>, strategy: ExecutionStrategy) -> Result<Self, HogError> {
        let mut gx = Image::from_size_val(src.size(), 0.0)?;
        let mut gy = Image::from_size_val(src.size(), 0.0)?;
        spatial_gradient_centered(src, &mut gx, &mut gy, strategy)?;
        Ok(Self { gx, gy })
    }
}

/// Compute the centered first order differences in x and y.
///
/// For an interior pixel `(i, j)`:
///
/// ```text
/// gx = I[i][j + 1] - I[i][j - 1]
/// gy = I[i - 1][j] - I[i + 1][j]
/// ```
///
/// A neighbor outside the image reads as zero, so the first column gets
/// `I[i][1] - 0`, the last column `0 - I[i][W - 2]`, the first row
/// `0 - I[1][j]` and the last row `I[H - 2][j] - 0`. Both axes are resolved
/// independently, so corners take the column rule for `gx` and the row rule
/// for `gy`. Note that `gy` is positive when the intensity grows upwards.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `gx` - The destination horizontal differences with shape (H, W).
/// * `gy` - The destination vertical differences with shape (H, W).
/// * `strategy` - How the rows are processed.
///
/// # Example
///
/// ```
/// use hog_image::{Image, ImageSize};
/// use hog_descriptor::{gradient::spatial_gradient_centered, ExecutionStrategy};
///
/// let src = Image::<f32, 1>::new(ImageSize { width: 3, height: 1 }, vec![1.0, 2.0, 4.0]).unwrap();
/// let mut gx = Image::from_size_val(src.size(), 0.0).unwrap();
/// let mut gy = Image::from_size_val(src.size(), 0.0).unwrap();
///
/// spatial_gradient_centered(&src, &mut gx, &mut gy, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(gx.as_slice(), &[2.0, 3.0, -2.0]);
/// assert_eq!(gy.as_slice(), &[0.0, 0.0, 0.0]);
/// ```
pub fn spatial_gradient_centered(
    src: &Image<f32, 1>,
    gx: &mut Image<f64, 1>,
    gy: &mut Image<f64, 1>,
    strategy: ExecutionStrategy,
) -> Result<(), HogError> {
    ensure_same_size(src, gx)?;
    ensure_same_size(src, gy)?;

    let rows = src.rows();
    let cols = src.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let src = src.cast_and_scale::<f64>(1.0)?;
    let src_data = src.as_slice();
    let at = |r: usize, c: usize| src_data[r * cols + c];

    parallel::for_each_row_pair(
        strategy,
        gx.as_slice_mut(),
        gy.as_slice_mut(),
        cols,
        |r, gx_row, gy_row| {
            for c in 0..cols {
                let left = if c > 0 { at(r, c - 1) } else { 0.0 };
                let right = if c + 1 < cols { at(r, c + 1) } else { 0.0 };
                let up = if r > 0 { at(r - 1, c) } else { 0.0 };
                let down = if r + 1 < rows { at(r + 1, c) } else { 0.0 };

                gx_row[c] = right - left;
                gy_row[c] = up - down;
            }
        },
    )?;

    Ok(())
}

use crate::{
    cell::CellHistograms,
    config::HogLayout,
    error::HogError,
    parallel::{self, ExecutionStrategy},
};

/// Normalize a vector in place by its L2 norm.
///
/// Every value becomes `v / (sqrt(sum(v^2)) + eps)`. A zero vector stays zero.
///
/// # Arguments
///
/// * `values` - The values to normalize.
/// * `eps` - A strictly positive constant added to the norm.
///
/// ```
/// use hog_descriptor::block::l2_normalize;
///
/// let mut v = [3.0, 4.0];
/// l2_normalize(&mut v, 0.0);
/// assert_eq!(v, [0.6, 0.8]);
/// ```
pub fn l2_normalize(values: &mut [f64], eps: f64) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    let denom = norm + eps;
    if denom == 0.0 {
        return;
    }
    values.iter_mut().for_each(|v| *v /= denom);
}

/// Copy the histograms of the block at row `by` and column `bx` into `dst`.
///
/// The block covers the cells starting at `(by * stride, bx * stride)`.
/// Cells are visited row by row and each one contributes its `bin_count`
/// values in bin order.
///
/// # Arguments
///
/// * `hist` - The cell histograms.
/// * `layout` - The descriptor geometry.
/// * `by` - The block row, `< layout.blocks_y`.
/// * `bx` - The block column, `< layout.blocks_x`.
/// * `dst` - The destination of length `layout.block_len()`.
pub fn gather_block(
    hist: &CellHistograms,
    layout: &HogLayout,
    by: usize,
    bx: usize,
    dst: &mut [f64],
) -> Result<(), HogError> {
    check_histograms(hist, layout)?;
    if dst.len() != layout.block_len() {
        return Err(HogError::HistogramLengthMismatch(
            dst.len(),
            layout.block_len(),
        ));
    }
    if by >= layout.blocks_y || bx >= layout.blocks_x {
        return Err(HogError::BlockLargerThanGrid {
            block: layout.block_size,
            cells_x: layout.cells_x,
            cells_y: layout.cells_y,
        });
    }
    copy_block(hist.as_slice(), layout, by, bx, dst);
    Ok(())
}

fn check_histograms(hist: &CellHistograms, layout: &HogLayout) -> Result<(), HogError> {
    if hist.cells_x() != layout.cells_x
        || hist.cells_y() != layout.cells_y
        || hist.bin_count() != layout.bin_count
    {
        return Err(HogError::HistogramLengthMismatch(
            hist.as_slice().len(),
            layout.histogram_len(),
        ));
    }
    Ok(())
}

// indices must be inside the grid described by `layout`
fn copy_block(src: &[f64], layout: &HogLayout, by: usize, bx: usize, dst: &mut [f64]) {
    let bin_count = layout.bin_count;
    let row_stride = layout.cells_x * bin_count;
    let block_row_len = layout.block_size.width * bin_count;

    let cell_y = by * layout.block_stride;
    let cell_x = bx * layout.block_stride;

    for (dy, dst_row) in dst.chunks_exact_mut(block_row_len).enumerate() {
        let start = (cell_y + dy) * row_stride + cell_x * bin_count;
        dst_row.copy_from_slice(&src[start..start + block_row_len]);
    }
}

/// Group the cell histograms into overlapping blocks and normalize each one.
///
/// Blocks are emitted row by row and the result is the concatenation of all
/// the normalized block vectors, of length `layout.descriptor_len()`.
///
/// # Arguments
///
/// * `hist` - The cell histograms.
/// * `layout` - The descriptor geometry.
/// * `eps` - The normalization constant.
/// * `strategy` - How the rows of blocks are processed.
pub fn normalize_blocks(
    hist: &CellHistograms,
    layout: &HogLayout,
    eps: f64,
    strategy: ExecutionStrategy,
) -> Result<Vec<f64>, HogError> {
    check_histograms(hist, layout)?;

    let src = hist.as_slice();
    let block_len = layout.block_len();
    let mut features = vec![0.0; layout.descriptor_len()];

    parallel::for_each_row(
        strategy,
        &mut features,
        layout.blocks_x * block_len,
        |by, features_row| {
            for (bx, block) in features_row.chunks_exact_mut(block_len).enumerate() {
                copy_block(src, layout, by, bx, block);
                l2_normalize(block, eps);
            }
        },
    )?;

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HogConfig;
    use approx::assert_abs_diff_eq;
    use hog_image::ImageSize;

    fn layout_3x2_cells() -> Result<HogLayout, HogError> {
        HogConfig::new()
            .with_bin_count(2)
            .with_cell_size(ImageSize::new(1, 1))
            .layout(ImageSize::new(3, 2))
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = [1.0, 2.0, 2.0];
        l2_normalize(&mut v, 1e-5);
        let denom = 3.0 + 1e-5;
        assert_eq!(v, [1.0 / denom, 2.0 / denom, 2.0 / denom]);

        let mut zeros = [0.0; 4];
        l2_normalize(&mut zeros, 1e-5);
        assert_eq!(zeros, [0.0; 4]);
    }

    #[test]
    fn test_gather_block() -> Result<(), HogError> {
        let layout = layout_3x2_cells()?;
        assert_eq!((layout.blocks_x, layout.blocks_y), (2, 1));

        // cell (cy, cx) holds [10 * cy + cx, -(10 * cy + cx)]
        let mut data = Vec::new();
        for cy in 0..2 {
            for cx in 0..3 {
                let v = (10 * cy + cx) as f64;
                data.extend_from_slice(&[v, -v]);
            }
        }
        let hist = CellHistograms::from_vec(3, 2, 2, data)?;

        let mut block = vec![0.0; layout.block_len()];
        gather_block(&hist, &layout, 0, 1, &mut block)?;
        assert_eq!(
            block,
            vec![1.0, -1.0, 2.0, -2.0, 11.0, -11.0, 12.0, -12.0]
        );

        let mut short = vec![0.0; 3];
        let res = gather_block(&hist, &layout, 0, 0, &mut short);
        assert!(matches!(res, Err(HogError::HistogramLengthMismatch(3, 8))));

        let res = gather_block(&hist, &layout, 0, 2, &mut block);
        assert!(matches!(res, Err(HogError::BlockLargerThanGrid { .. })));

        Ok(())
    }

    #[test]
    fn test_normalize_blocks() -> Result<(), HogError> {
        let layout = layout_3x2_cells()?;
        let hist = CellHistograms::from_vec(3, 2, 2, (0..12).map(|v| v as f64).collect())?;

        let features = normalize_blocks(&hist, &layout, 1e-5, ExecutionStrategy::Serial)?;
        assert_eq!(features.len(), layout.descriptor_len());

        for block in features.chunks_exact(layout.block_len()) {
            let norm = block.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-5);
            assert!(norm <= 1.0);
        }

        // first block gathers cells (0, 0), (0, 1), (1, 0), (1, 1)
        let raw = [0.0, 1.0, 2.0, 3.0, 6.0, 7.0, 8.0, 9.0];
        let denom = raw.iter().map(|v| v * v).sum::<f64>().sqrt() + 1e-5;
        for (got, v) in features.iter().zip(raw) {
            assert_eq!(*got, v / denom);
        }

        let parallel = normalize_blocks(&hist, &layout, 1e-5, ExecutionStrategy::ParallelRows)?;
        assert_eq!(features, parallel);

        Ok(())
    }

    #[test]
    fn test_normalize_blocks_with_stride() -> Result<(), HogError> {
        let layout = HogConfig::new()
            .with_bin_count(1)
            .with_cell_size(ImageSize::new(1, 1))
            .with_block_stride(2)
            .layout(ImageSize::new(4, 4))?;
        assert_eq!((layout.blocks_x, layout.blocks_y), (2, 2));

        let hist = CellHistograms::from_vec(4, 4, 1, (0..16).map(|v| v as f64).collect())?;
        let features = normalize_blocks(&hist, &layout, 1e-5, ExecutionStrategy::Serial)?;
        assert_eq!(features.len(), 16);

        // the last block starts at cell (2, 2): values 10, 11, 14, 15
        let last = &features[12..];
        let denom = (10f64.powi(2) + 11f64.powi(2) + 14f64.powi(2) + 15f64.powi(2)).sqrt() + 1e-5;
        assert_abs_diff_eq!(last[0], 10.0 / denom, epsilon = 1e-12);
        assert_abs_diff_eq!(last[3], 15.0 / denom, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_normalize_blocks_zero_histograms() -> Result<(), HogError> {
        let layout = layout_3x2_cells()?;
        let hist = CellHistograms::zeros(3, 2, 2);
        let features = normalize_blocks(&hist, &layout, 1e-5, ExecutionStrategy::Serial)?;
        assert!(features.iter().all(|v| *v == 0.0));

        let other = CellHistograms::zeros(2, 3, 2);
        let res = normalize_blocks(&other, &layout, 1e-5, ExecutionStrategy::Serial);
        assert!(matches!(res, Err(HogError::HistogramLengthMismatch(12, 12))));
        Ok(())
    }
}

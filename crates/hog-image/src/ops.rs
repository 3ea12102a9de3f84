use crate::{Image, ImageError};

/// Check that two images share the same size.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] with the source and destination
/// dimensions when they differ.
pub fn ensure_same_size<T, U, const C1: usize, const C2: usize>(
    src: &Image<T, C1>,
    dst: &Image<U, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageSize;

    #[test]
    fn test_ensure_same_size() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 1)?;
        let same = Image::<f64, 3>::from_size_val(ImageSize::new(2, 2), 0.0)?;
        let other = Image::<f32, 1>::from_size_val([3, 2].into(), 0.0)?;

        assert_eq!(ensure_same_size(&image, &same), Ok(()));
        assert_eq!(
            ensure_same_size(&image, &other),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );

        Ok(())
    }
}

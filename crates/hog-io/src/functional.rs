use std::path::Path;

use hog_image::{Image, ImageSize};

use crate::error::IoError;

/// The size of the HOG detection window, 64 pixels wide and 128 pixels high.
pub const DETECTION_WINDOW: ImageSize = ImageSize::new(64, 128);

/// The default divisor between 8 bit gray levels and intensities.
pub const INTENSITY_FACTOR: f32 = 257.0;

fn check_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(())
}

fn decode_image(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    check_exists(file_path)?;
    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

fn luma_to_image(img: image::GrayImage) -> Result<Image<u8, 1>, IoError> {
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_raw())?)
}

/// Reads an image from the given file path as 8 bit grayscale.
///
/// Any format supported by the image crate is accepted, color images are
/// converted to luma.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A grayscale image with a single channel.
pub fn read_image_gray(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode_image(file_path.as_ref())?;
    luma_to_image(img.into_luma8())
}

/// Reads an image, resizes it with nearest neighbor sampling and converts it to grayscale.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
/// * `size` - The output size, usually [`DETECTION_WINDOW`].
pub fn read_image_gray_resized(
    file_path: impl AsRef<Path>,
    size: ImageSize,
) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    let img = decode_image(file_path)?;

    log::info!(
        "resizing {} from {}x{} to {}",
        file_path.display(),
        img.width(),
        img.height(),
        size
    );

    let resized = img.resize_exact(
        size.width as u32,
        size.height as u32,
        image::imageops::FilterType::Nearest,
    );
    luma_to_image(resized.into_luma8())
}

/// Writes a grayscale image, the format is taken from the extension.
///
/// # Arguments
///
/// * `file_path` - The destination path, ending in `png`, `jpg` or `jpeg`.
/// * `image` - The image to write.
pub fn write_image_gray(file_path: impl AsRef<Path>, image: &Image<u8, 1>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let valid = file_path.extension().is_some_and(|ext| {
        let ext = ext.to_ascii_lowercase();
        ext == "png" || ext == "jpg" || ext == "jpeg"
    });
    if !valid {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    image::save_buffer(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ColorType::L8,
    )?;

    Ok(())
}

/// Converts 8 bit gray levels to intensities by dividing by [`INTENSITY_FACTOR`].
///
/// ```
/// use hog_image::{Image, ImageSize};
/// use hog_io::functional::gray_to_intensity;
///
/// let gray = Image::<u8, 1>::new(ImageSize::new(2, 1), vec![0, 255]).unwrap();
/// let intensity = gray_to_intensity(&gray).unwrap();
///
/// assert_eq!(intensity.as_slice(), &[0.0, 255.0 / 257.0]);
/// ```
pub fn gray_to_intensity(image: &Image<u8, 1>) -> Result<Image<f32, 1>, IoError> {
    let data = image
        .as_slice()
        .iter()
        .map(|&v| f32::from(v) / INTENSITY_FACTOR)
        .collect();
    Ok(Image::new(image.size(), data)?)
}

/// Converts a grid of values back to 8 bit gray levels.
///
/// Each value is multiplied by `factor` and saturated to `[0, 255]`.
///
/// # Arguments
///
/// * `image` - The values to convert, e.g. the gradient magnitudes.
/// * `factor` - The multiplier, [`INTENSITY_FACTOR`] to invert [`gray_to_intensity`].
pub fn intensity_to_gray(image: &Image<f64, 1>, factor: f64) -> Result<Image<u8, 1>, IoError> {
    let data = image
        .as_slice()
        .iter()
        .map(|&v| (v * factor) as u8)
        .collect();
    Ok(Image::new(image.size(), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_conversions() -> Result<(), IoError> {
        let gray = Image::<u8, 1>::new(ImageSize::new(3, 1), vec![0, 128, 255])?;
        let intensity = gray_to_intensity(&gray)?;
        assert_eq!(intensity.as_slice(), &[0.0, 128.0 / 257.0, 255.0 / 257.0]);

        let values = Image::<f64, 1>::new(ImageSize::new(4, 1), vec![0.5, -1.0, 2.0, 0.25])?;
        let gray = intensity_to_gray(&values, 257.0)?;
        assert_eq!(gray.as_slice(), &[128, 0, 255, 64]);

        Ok(())
    }

    #[test]
    fn test_read_write_gray() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("ramp.png");

        let size = ImageSize::new(16, 8);
        let data = (0..size.area()).map(|i| (i * 2) as u8).collect();
        let image = Image::<u8, 1>::new(size, data)?;
        write_image_gray(&file_path, &image)?;

        let back = read_image_gray(&file_path)?;
        assert_eq!(back, image);

        let resized = read_image_gray_resized(&file_path, ImageSize::new(8, 4))?;
        assert_eq!(resized.size(), ImageSize::new(8, 4));

        let window = read_image_gray_resized(&file_path, DETECTION_WINDOW)?;
        assert_eq!(window.size(), DETECTION_WINDOW);

        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        let res = read_image_gray("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn test_write_invalid_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = Image::<u8, 1>::from_size_val(ImageSize::new(2, 2), 0)?;

        let res = write_image_gray(tmp_dir.path().join("image.txt"), &image);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        let res = write_image_gray(tmp_dir.path().join("image"), &image);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        Ok(())
    }
}

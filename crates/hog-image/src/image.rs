use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels. The same struct is
/// used to describe cell sizes (in pixels) and block sizes (in cells).
///
/// # Examples
///
/// ```
/// use hog_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 64,
///   height: 128,
/// };
///
/// assert_eq!(image_size.width, 64);
/// assert_eq!(image_size.height, 128);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Create a new size from its width and height.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of elements covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether any of the two dimensions is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored row-major with interleaved channels, i.e. the
/// element `(row, col, ch)` lives at `(row * width + col) * CHANNELS + ch`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use hog_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 1>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0.0; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.width * size.height * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use hog_image::{Image, ImageSize};
    ///
    /// let image = Image::<f64, 1>::from_size_val([3, 2].into(), 0.5).unwrap();
    ///
    /// assert_eq!(image.as_slice(), &[0.5; 6]);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Cast the pixel data to a different type and scale it.
    ///
    /// # Arguments
    ///
    /// * `scale` - The scale to multiply the pixel data with.
    ///
    /// # Errors
    ///
    /// If the pixel data cannot be cast to the new type, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use hog_image::{Image, ImageSize};
    ///
    /// let image_u8 = Image::<u8, 1>::new([2, 1].into(), vec![0, 255]).unwrap();
    /// let image_f32 = image_u8.cast_and_scale::<f32>(1.0 / 255.0).unwrap();
    ///
    /// assert_eq!(image_f32.get([0, 1, 0]), Some(&1.0f32));
    /// ```
    pub fn cast_and_scale<U>(&self, scale: U) -> Result<Image<U, CHANNELS>, ImageError>
    where
        T: Copy + num_traits::NumCast,
        U: Copy + num_traits::NumCast + std::ops::Mul<Output = U>,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                let xu = U::from(x)
                    .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
                Ok(xu * scale)
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the pixel data as a flat row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat row-major mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the element at `[row, col, channel]`.
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [row, col, ch] = index;
        if row >= self.rows() || col >= self.cols() || ch >= CHANNELS {
            return None;
        }
        self.data.get((row * self.cols() + col) * CHANNELS + ch)
    }
}

use hog_image::{Image, ImageSize};
use serde::{Deserialize, Serialize};

use crate::{
    binning::OrientationBinner,
    block::normalize_blocks,
    cell::compute_cell_histograms,
    config::{HogConfig, HogLayout},
    error::HogError,
    gradient::GradientField,
    observer::{HogObserver, NoopObserver},
    polar::PolarField,
};

/// A HOG feature vector together with the geometry that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HogDescriptor {
    /// The concatenated normalized block vectors.
    pub features: Vec<f64>,
    /// The geometry of the descriptor.
    pub layout: HogLayout,
}

impl HogDescriptor {
    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the descriptor has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The features as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.features
    }

    /// Consume the descriptor and return the features.
    pub fn into_vec(self) -> Vec<f64> {
        self.features
    }

    /// The normalized vector of the block at row `by` and column `bx`.
    pub fn block(&self, by: usize, bx: usize) -> Option<&[f64]> {
        if by >= self.layout.blocks_y || bx >= self.layout.blocks_x {
            return None;
        }
        let block_len = self.layout.block_len();
        let start = (by * self.layout.blocks_x + bx) * block_len;
        self.features.get(start..start + block_len)
    }
}

/// Computes HOG descriptors of grayscale images.
///
/// The pipeline runs five stages, each one consuming the output of the
/// previous one: centered gradients, magnitude and angle, cell histograms,
/// and finally block normalization into the feature vector.
///
/// # Examples
///
/// ```
/// use hog_descriptor::{HogConfig, HogPipeline};
/// use hog_image::{Image, ImageSize};
///
/// let pipeline = HogPipeline::new(HogConfig::default()).unwrap();
/// let image = Image::<f32, 1>::from_size_val(ImageSize::new(64, 128), 0.0).unwrap();
///
/// let descriptor = pipeline.compute(&image).unwrap();
/// assert_eq!(descriptor.len(), 3780);
/// assert!(descriptor.as_slice().iter().all(|v| *v == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct HogPipeline {
    config: HogConfig,
    binner: OrientationBinner,
}

impl HogPipeline {
    /// Create a pipeline from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, see [`HogConfig::validate`].
    pub fn new(config: HogConfig) -> Result<Self, HogError> {
        config.validate()?;
        let binner = OrientationBinner::new(config.bin_count)?;
        Ok(Self { config, binner })
    }

    /// The configuration of the pipeline.
    pub fn config(&self) -> &HogConfig {
        &self.config
    }

    /// The descriptor geometry for images of the given size.
    pub fn layout(&self, image_size: ImageSize) -> Result<HogLayout, HogError> {
        self.config.layout(image_size)
    }

    /// Compute the descriptor of an image.
    ///
    /// # Arguments
    ///
    /// * `image` - The grayscale image with intensities in `[0, 1]`.
    pub fn compute(&self, image: &Image<f32, 1>) -> Result<HogDescriptor, HogError> {
        self.compute_with_observer(image, &mut NoopObserver)
    }

    /// Compute the descriptor of an image and report every intermediate artifact.
    ///
    /// # Arguments
    ///
    /// * `image` - The grayscale image with intensities in `[0, 1]`.
    /// * `observer` - Receives the artifacts of each stage.
    ///
    /// # Errors
    ///
    /// Fails if the image size does not fit the configuration or if the
    /// observer returns an error.
    pub fn compute_with_observer<O: HogObserver + ?Sized>(
        &self,
        image: &Image<f32, 1>,
        observer: &mut O,
    ) -> Result<HogDescriptor, HogError> {
        let layout = self.config.layout(image.size())?;
        let strategy = self.config.strategy;

        log::debug!(
            "computing hog of {} with {}x{} cells and {}x{} blocks",
            layout.image_size,
            layout.cells_x,
            layout.cells_y,
            layout.blocks_x,
            layout.blocks_y
        );

        observer.on_input(image)?;

        let gradient = GradientField::compute(image, strategy)?;
        observer.on_gradients(&gradient)?;

        let polar = PolarField::from_gradient(&gradient, self.config.angle, strategy)?;
        observer.on_polar(&polar)?;

        let hist = compute_cell_histograms(&polar, &layout, &self.binner, strategy)?;
        observer.on_cell_histograms(&hist)?;

        let features = normalize_blocks(&hist, &layout, self.config.epsilon, strategy)?;
        let descriptor = HogDescriptor { features, layout };
        observer.on_features(&descriptor)?;

        log::debug!("computed {} features", descriptor.len());

        Ok(descriptor)
    }
}

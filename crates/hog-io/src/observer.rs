use std::path::{Path, PathBuf};

use hog_descriptor::{
    CellHistograms, GradientField, HogDescriptor, HogError, HogObserver, PolarField,
};
use hog_image::Image;

use crate::{
    error::IoError,
    json::{grid_rows, histogram_grid, write_features_json, write_json},
};

/// File name of the input intensity grid dump.
pub const INTENSITIES_FILE: &str = "intensities.json";
/// File name of the horizontal difference grid dump.
pub const GRADIENT_X_FILE: &str = "gradient_x.json";
/// File name of the vertical difference grid dump.
pub const GRADIENT_Y_FILE: &str = "gradient_y.json";
/// File name of the magnitude grid dump.
pub const MAGNITUDES_FILE: &str = "magnitudes.json";
/// File name of the angle grid dump.
pub const ANGLES_FILE: &str = "angles.json";
/// File name of the cell histograms dump.
pub const HISTOGRAMS_FILE: &str = "histograms.json";
/// File name of the feature vector dump.
pub const FEATURES_FILE: &str = "features.json";

/// Writes the intermediate grids and the features of a run as JSON files.
///
/// The input intensities, the gradients, the magnitudes and the angles are
/// written as `[row][col]`, the cell histograms as
/// `[cell_row][cell_col][bin]` and the features as a flat array.
///
/// # Examples
///
/// ```no_run
/// use hog_descriptor::{HogConfig, HogPipeline};
/// use hog_io::{functional as F, JsonDumpObserver};
///
/// let gray = F::read_image_gray_resized("person.png", F::DETECTION_WINDOW).unwrap();
/// let image = F::gray_to_intensity(&gray).unwrap();
///
/// let mut observer = JsonDumpObserver::new("dump").unwrap();
/// let pipeline = HogPipeline::new(HogConfig::default()).unwrap();
/// pipeline.compute_with_observer(&image, &mut observer).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct JsonDumpObserver {
    output_dir: PathBuf,
}

impl JsonDumpObserver {
    /// Create the observer, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, IoError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// The directory the files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn dump<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), HogError> {
        let file_path = self.output_dir.join(name);
        log::info!("writing {}", file_path.display());
        write_json(file_path, value).map_err(HogError::observer)
    }
}

impl HogObserver for JsonDumpObserver {
    fn on_input(&mut self, image: &Image<f32, 1>) -> Result<(), HogError> {
        self.dump(INTENSITIES_FILE, &grid_rows(image))
    }

    fn on_gradients(&mut self, gradient: &GradientField) -> Result<(), HogError> {
        self.dump(GRADIENT_X_FILE, &grid_rows(&gradient.gx))?;
        self.dump(GRADIENT_Y_FILE, &grid_rows(&gradient.gy))
    }

    fn on_polar(&mut self, polar: &PolarField) -> Result<(), HogError> {
        self.dump(MAGNITUDES_FILE, &grid_rows(&polar.magnitude))?;
        self.dump(ANGLES_FILE, &grid_rows(&polar.angle))
    }

    fn on_cell_histograms(&mut self, hist: &CellHistograms) -> Result<(), HogError> {
        self.dump(HISTOGRAMS_FILE, &histogram_grid(hist))
    }

    fn on_features(&mut self, descriptor: &HogDescriptor) -> Result<(), HogError> {
        let file_path = self.output_dir.join(FEATURES_FILE);
        log::info!("writing {}", file_path.display());
        write_features_json(file_path, descriptor).map_err(HogError::observer)
    }
}

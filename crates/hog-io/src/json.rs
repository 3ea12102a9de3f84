use std::{fs::File, io::BufWriter, path::Path};

use hog_descriptor::{CellHistograms, HogDescriptor};
use hog_image::Image;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::IoError;

/// Serialize a value as indented JSON into a file.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `value` - The value to serialize.
pub fn write_json<T: Serialize + ?Sized>(
    file_path: impl AsRef<Path>,
    value: &T,
) -> Result<(), IoError> {
    let writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Deserialize a value from a JSON file.
///
/// # Arguments
///
/// * `file_path` - The path to an existing JSON file.
pub fn read_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    let content = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Writes the feature vector of a descriptor as a flat JSON array.
pub fn write_features_json(
    file_path: impl AsRef<Path>,
    descriptor: &HogDescriptor,
) -> Result<(), IoError> {
    write_json(file_path, descriptor.as_slice())
}

/// Reads a flat JSON array of features.
pub fn read_features_json(file_path: impl AsRef<Path>) -> Result<Vec<f64>, IoError> {
    read_json(file_path)
}

/// Split a single channel grid into its rows.
pub fn grid_rows<T>(image: &Image<T, 1>) -> Vec<&[T]> {
    if image.width() == 0 {
        return Vec::new();
    }
    image.as_slice().chunks_exact(image.width()).collect()
}

/// Arrange the cell histograms as `[cell_row][cell_col][bin]`.
pub fn histogram_grid(hist: &CellHistograms) -> Vec<Vec<&[f64]>> {
    (0..hist.cells_y())
        .map(|cy| {
            (0..hist.cells_x())
                .filter_map(|cx| hist.get(cy, cx))
                .collect()
        })
        .collect()
}

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] hog_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// Error raised by the descriptor pipeline.
    #[error("Failed to compute the descriptor. {0}")]
    DescriptorError(#[from] hog_descriptor::HogError),

    /// Error to serialize or deserialize json.
    #[error("Failed to process json. {0}")]
    JsonError(#[from] serde_json::Error),
}

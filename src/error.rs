use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloorplanError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not decode {}: {source}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Crop selection is empty")]
    NoActiveSelection,

    #[error("Image has not been laid out yet")]
    ZeroViewport,
}

pub type Result<T> = std::result::Result<T, FloorplanError>;

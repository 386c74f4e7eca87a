//! Error type for editor operations.
//!
//! Most geometric edge cases (zero-sized layout, collapsed resize, missing
//! snapshot) are absorbed silently by the editor and never surface here.

use thiserror::Error;

/// Errors returned across the editor boundary.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Upload is not a recognizable image (bad prefix, bad base64, undecodable bytes)
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Raw RGBA data does not match the declared dimensions
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// PNG encoding failed while exporting
    #[error("encoding image: {0}")]
    Encode(String),

    /// Operation needs a loaded image
    #[error("no image loaded")]
    NoImage,

    /// A background filter is still running against the current image
    #[error("a filter is already running")]
    FilterBusy,

    /// Filters read the surface, which carries the crop overlay while cropping
    #[error("filters are unavailable while crop mode is active")]
    CropModeActive,

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A filter request from the host could not be parsed
    #[error("invalid filter request: {0}")]
    InvalidRequest(String),
}

impl EditorError {
    /// Condensed message suitable for showing to the person using the editor.
    pub fn to_user_facing(&self) -> String {
        match self {
            Self::InvalidImage(_) => "Please upload a file in an image format".to_string(),
            Self::FilterBusy => "Please wait for the current filter to finish".to_string(),
            Self::NoImage => "Upload an image first".to_string(),
            _ => "Something went wrong while editing the image".to_string(),
        }
    }
}

impl From<image::ImageError> for EditorError {
    fn from(value: image::ImageError) -> Self {
        Self::InvalidImage(value.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

//! Error types for image capture.

use stopscan_core::model::PoiErrorKind;
use stopscan_core::providers::ProviderError;
use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors that can occur while capturing or processing images.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Bytes are not a recognised image format
    #[error("Unknown image format")]
    UnknownFormat,

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),

    /// Rejected capture parameters
    #[error("Invalid capture options: {0}")]
    InvalidOptions(String),

    /// The imagery provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image processing error: {0}")]
    Processing(#[from] image::ImageError),
}

impl CaptureError {
    /// Category recorded against the point of interest.
    pub fn kind(&self) -> PoiErrorKind {
        match self {
            CaptureError::Provider(e) => e.kind(),
            _ => PoiErrorKind::Capture,
        }
    }
}

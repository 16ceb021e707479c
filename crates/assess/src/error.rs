//! Error types for assessment.

use thiserror::Error;

/// Result type alias for assessment operations.
pub type Result<T> = std::result::Result<T, AssessError>;

#[derive(Debug, Error)]
pub enum AssessError {
    /// A detection label line could not be parsed
    #[error("invalid label on line {line}: {message}")]
    InvalidLabel { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AssessError {
    pub(crate) fn label(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidLabel { line, message: message.into() }
    }
}

impl From<AssessError> for stopscan_core::Error {
    fn from(err: AssessError) -> Self {
        let code = match &err {
            AssessError::InvalidLabel { .. } => stopscan_core::ErrorCode::InvalidLabel,
            AssessError::Io(_) => stopscan_core::ErrorCode::IoError,
            AssessError::Image(_) => stopscan_core::ErrorCode::InvalidImage,
        };
        stopscan_core::Error::new(code, err.to_string()).with_source(err)
    }
}

//! Error types for multipoint sampling.

use stopscan_core::model::PoiErrorKind;
use stopscan_core::providers::ProviderError;
use stopscan_geo::GeoError;
use thiserror::Error;

/// Result type alias for sampling operations.
pub type Result<T> = std::result::Result<T, SamplingError>;

/// Errors raised while locating a road or sampling along it.
#[derive(Debug, Error)]
pub enum SamplingError {
    /// No usable road near the point of interest
    #[error("{0}")]
    GeometryNotFound(String),

    /// A collaborator call failed
    #[error(transparent)]
    Transport(#[from] ProviderError),

    /// Invalid sampling parameters
    #[error("Invalid sampling options: {0}")]
    InvalidOptions(String),

    /// Geometry computation failed
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl SamplingError {
    /// Category used when this error is recorded on a point of interest
    pub fn kind(&self) -> PoiErrorKind {
        match self {
            Self::GeometryNotFound(_) => PoiErrorKind::GeometryNotFound,
            Self::Transport(e) => e.kind(),
            Self::InvalidOptions(_) | Self::Geo(_) => PoiErrorKind::GeometryNotFound,
        }
    }
}

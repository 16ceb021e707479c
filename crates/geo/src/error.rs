//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Bearing between two identical points
    #[error("Bearing is undefined between identical points ({0})")]
    DegenerateBearing(String),

    /// A line needs at least two distinct vertices
    #[error("Empty geometry: {0}")]
    EmptyGeometry(String),

    /// Segments could not be joined into one line
    #[error("Disconnected road segments: {components} separate pieces")]
    DisconnectedSegments {
        /// Number of connected components found
        components: usize,
    },

    /// Segments join in a fork rather than a single path
    #[error("Road segments branch at {junctions} junction(s)")]
    BranchingSegments {
        /// Number of vertices shared by more than two segments
        junctions: usize,
    },

    /// Sampling interval must be a positive finite distance
    #[error("Invalid sampling interval: {0}")]
    InvalidInterval(f64),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with stopscan-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid WKT format
    InvalidWkt = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
    /// Bearing between identical points
    DegenerateBearing = 10004,
    /// Empty or single-vertex geometry
    EmptyGeometry = 10005,
    /// Segments could not be merged
    UnmergeableSegments = 10006,
    /// Invalid sampling interval
    InvalidInterval = 10007,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidWkt(_) => GeoErrorCode::InvalidWkt,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
            GeoError::DegenerateBearing(_) => GeoErrorCode::DegenerateBearing,
            GeoError::EmptyGeometry(_) => GeoErrorCode::EmptyGeometry,
            GeoError::DisconnectedSegments { .. } | GeoError::BranchingSegments { .. } => {
                GeoErrorCode::UnmergeableSegments
            }
            GeoError::InvalidInterval(_) => GeoErrorCode::InvalidInterval,
        }
    }
}

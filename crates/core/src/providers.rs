//! Collaborator traits for the mapping services the pipeline talks to.
//!
//! The sampling engine only sees these traits, so it can run against the
//! HTTP clients in `stopscan-api-client` or against in-memory stubs.

use crate::model::{PanoramaId, PoiErrorKind};
use serde::{Deserialize, Serialize};
use stopscan_geo::{BoundingBox, Coordinate};
use thiserror::Error;

/// Failure reported by a collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Connection, timeout or TLS failure
    #[error("{0}")]
    Transport(String),

    /// Non-success HTTP status or API status field
    #[error("({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered but had nothing to offer
    #[error("{0}")]
    NoResults(String),

    /// The response body could not be understood
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Category used when this failure is recorded on a point of interest
    pub fn kind(&self) -> PoiErrorKind {
        match self {
            Self::NoResults(_) => PoiErrorKind::NoResults,
            _ => PoiErrorKind::Transport,
        }
    }
}

/// Result type for collaborator calls
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// A ranked nearby-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub coords: Coordinate,
    pub place_id: String,
    pub name: String,
}

/// A road line in geographic coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoadFeature {
    pub coords: Vec<Coordinate>,
    pub name: Option<String>,
    /// TIGER base name, used when the way has no proper name
    pub base_name: Option<String>,
}

/// Highway classes to request from the road network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighwayFilter {
    classes: Vec<String>,
}

impl HighwayFilter {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Roads a bus can drive on
    pub fn vehicular() -> Self {
        Self::new(["motorway", "trunk", "primary", "secondary", "tertiary", "residential"])
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Anchored alternation, e.g. `^(primary|secondary)$`
    pub fn to_regex(&self) -> String {
        format!("^({})$", self.classes.join("|"))
    }
}

impl Default for HighwayFilter {
    fn default() -> Self {
        Self::vehicular()
    }
}

/// Panorama nearest to a requested location.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoramaMetadata {
    pub pano_id: PanoramaId,
    /// Where the camera actually stood
    pub coords: Coordinate,
    pub date: Option<String>,
}

/// What an image request points the camera from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTarget {
    Panorama(PanoramaId),
    Location(Coordinate),
}

/// A single street-level image request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub target: ImageTarget,
    pub heading: f64,
    pub fov: u32,
    pub width: u32,
    pub height: u32,
}

/// Nearest-place search by keyword.
pub trait PlaceSearch {
    /// Places matching `keyword` ranked by distance from `at`; may be empty.
    fn nearby_search(&self, at: Coordinate, keyword: &str, radius_m: f64) -> ProviderResult<Vec<PlaceRecord>>;
}

/// Road geometry source.
pub trait RoadNetwork {
    fn road_features_in_bbox(&self, bbox: &BoundingBox, filter: &HighwayFilter) -> ProviderResult<Vec<RoadFeature>>;
}

/// Street-level panorama lookup.
pub trait PanoramaSource {
    /// Metadata of the panorama nearest to `at`.
    ///
    /// Returns [`ProviderError::NoResults`] when there is no imagery nearby.
    fn panorama_metadata(&self, at: Coordinate) -> ProviderResult<PanoramaMetadata>;
}

/// Street-level image download.
pub trait ImageSource {
    /// Encoded image bytes as returned by the provider
    fn fetch_image(&self, request: &ImageRequest) -> ProviderResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicular_regex() {
        assert_eq!(
            HighwayFilter::vehicular().to_regex(),
            "^(motorway|trunk|primary|secondary|tertiary|residential)$"
        );
    }

    #[test]
    fn test_provider_error_kind() {
        assert_eq!(ProviderError::NoResults("none".into()).kind(), PoiErrorKind::NoResults);
        assert_eq!(ProviderError::Decode("bad".into()).kind(), PoiErrorKind::Transport);
    }

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::Api { status: 403, message: "REQUEST_DENIED".into() };
        assert_eq!(err.to_string(), "(403): REQUEST_DENIED");
    }
}

//! Street View Static API: panorama metadata and images

use super::LatLng;
use crate::client::MapsClient;
use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use stopscan_core::model::PanoramaId;
use stopscan_core::providers::{
    ImageRequest, ImageSource, ImageTarget, PanoramaMetadata, PanoramaSource, ProviderResult,
};
use stopscan_geo::Coordinate;

/// Street View API interface
#[derive(Clone)]
pub struct StreetViewApi {
    client: MapsClient,
}

impl StreetViewApi {
    pub(crate) fn new(client: MapsClient) -> Self {
        Self { client }
    }

    /// Metadata of the panorama nearest to `at`
    pub fn metadata(&self, at: Coordinate) -> ApiResult<PanoramaMetadata> {
        let query = [
            ("location", at.to_string()),
            ("return_error_code", "true".to_string()),
            ("key", self.client.api_key().to_string()),
        ];
        let response: MetadataResponse =
            self.client
                .get_json("streetview-metadata", "pulling metadata", "streetview/metadata", &query)?;
        response.into_metadata(at)
    }

    /// Download one image
    pub fn image(&self, request: &ImageRequest) -> ApiResult<Vec<u8>> {
        let query = image_query(request, self.client.api_key());
        self.client.get_bytes("streetview-image", "pulling image", "streetview", &query)
    }
}

fn image_query(request: &ImageRequest, key: &str) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("size", format!("{}x{}", request.width, request.height)),
        ("fov", request.fov.to_string()),
        ("heading", format!("{:.2}", request.heading)),
        ("source", "outdoor".to_string()),
        ("return_error_code", "true".to_string()),
        ("key", key.to_string()),
    ];
    match &request.target {
        ImageTarget::Panorama(id) => query.push(("pano", id.to_string())),
        ImageTarget::Location(at) => query.push(("location", at.to_string())),
    }
    query
}

/// Metadata response body
#[derive(Debug, Clone, Deserialize)]
struct MetadataResponse {
    status: String,
    pano_id: Option<String>,
    location: Option<LatLng>,
    date: Option<String>,
    error_message: Option<String>,
}

impl MetadataResponse {
    fn into_metadata(self, requested: Coordinate) -> ApiResult<PanoramaMetadata> {
        match self.status.as_str() {
            "OK" => Ok(PanoramaMetadata {
                pano_id: PanoramaId::new(self.pano_id.ok_or(ApiError::MissingField("pano_id"))?),
                coords: self.location.ok_or(ApiError::MissingField("location"))?.into(),
                date: self.date,
            }),
            "ZERO_RESULTS" | "NOT_FOUND" => Err(ApiError::NoResults(format!("no panorama near {requested}"))),
            _ => Err(ApiError::ApiStatus {
                status: self.status,
                message: self.error_message.unwrap_or_default(),
            }),
        }
    }
}

impl PanoramaSource for MapsClient {
    fn panorama_metadata(&self, at: Coordinate) -> ProviderResult<PanoramaMetadata> {
        Ok(self.streetview().metadata(at)?)
    }
}

impl ImageSource for MapsClient {
    fn fetch_image(&self, request: &ImageRequest) -> ProviderResult<Vec<u8>> {
        Ok(self.streetview().image(request)?)
    }
}

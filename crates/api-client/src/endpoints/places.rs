//! Places API nearby search

use super::LatLng;
use crate::client::MapsClient;
use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use stopscan_core::providers::{PlaceRecord, PlaceSearch, ProviderResult};
use stopscan_geo::Coordinate;

/// Places API interface
#[derive(Clone)]
pub struct PlacesApi {
    client: MapsClient,
}

impl PlacesApi {
    pub(crate) fn new(client: MapsClient) -> Self {
        Self { client }
    }

    /// Places matching `keyword`, nearest first
    ///
    /// Results are ranked by distance, which the API does not combine with
    /// a radius, so matches farther than `radius_m` are dropped here.
    pub fn nearby(&self, at: Coordinate, keyword: &str, radius_m: f64) -> ApiResult<Vec<PlaceRecord>> {
        let query = [
            ("location", at.to_string()),
            ("keyword", keyword.to_string()),
            ("rankby", "distance".to_string()),
            ("key", self.client.api_key().to_string()),
        ];
        let response: NearbyResponse =
            self.client
                .get_json("places", "pulling nearby search results", "place/nearbysearch/json", &query)?;
        response.into_places(at, radius_m)
    }
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    geometry: PlaceGeometry,
    place_id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: LatLng,
}

impl NearbyResponse {
    fn into_places(self, at: Coordinate, radius_m: f64) -> ApiResult<Vec<PlaceRecord>> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self
                .results
                .into_iter()
                .map(|r| PlaceRecord {
                    coords: r.geometry.location.into(),
                    place_id: r.place_id,
                    name: r.name,
                })
                .filter(|p| stopscan_geo::haversine_distance_meters(&at, &p.coords) <= radius_m)
                .collect()),
            _ => Err(ApiError::ApiStatus {
                status: self.status,
                message: self.error_message.unwrap_or_default(),
            }),
        }
    }
}

impl PlaceSearch for MapsClient {
    fn nearby_search(&self, at: Coordinate, keyword: &str, radius_m: f64) -> ProviderResult<Vec<PlaceRecord>> {
        Ok(self.places().nearby(at, keyword, radius_m)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT: Coordinate = Coordinate { latitude: 33.7490, longitude: -84.3880 };

    const BODY: &str = r#"{
        "html_attributions": [],
        "results": [
            {
                "geometry": {"location": {"lat": 33.74912, "lng": -84.38811}},
                "name": "Peachtree St SW & Alabama St",
                "place_id": "ChIJ-near",
                "types": ["bus_station", "transit_station"]
            },
            {
                "geometry": {"location": {"lat": 33.76, "lng": -84.38}},
                "name": "Far Away Stop",
                "place_id": "ChIJ-far"
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn test_parse_and_filter_by_radius() {
        let response: NearbyResponse = serde_json::from_str(BODY).unwrap();
        let places = response.into_places(AT, 200.0).unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place_id, "ChIJ-near");
        assert_eq!(places[0].name, "Peachtree St SW & Alabama St");
    }

    #[test]
    fn test_zero_results_is_empty() {
        let response: NearbyResponse =
            serde_json::from_str(r#"{"html_attributions": [], "results": [], "status": "ZERO_RESULTS"}"#).unwrap();
        assert!(response.into_places(AT, 200.0).unwrap().is_empty());
    }

    #[test]
    fn test_over_query_limit() {
        let response: NearbyResponse = serde_json::from_str(r#"{"status": "OVER_QUERY_LIMIT"}"#).unwrap();
        assert!(matches!(response.into_places(AT, 200.0), Err(ApiError::ApiStatus { .. })));
    }
}

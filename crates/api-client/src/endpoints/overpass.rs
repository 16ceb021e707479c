//! Overpass API: road ways inside a bounding box

use crate::client::MapsClient;
use crate::error::ApiResult;
use serde::Deserialize;
use std::collections::HashMap;
use stopscan_core::providers::{HighwayFilter, ProviderResult, RoadFeature, RoadNetwork};
use stopscan_geo::{BoundingBox, Coordinate};
use tracing::debug;

/// Server-side query timeout, in seconds
const QUERY_TIMEOUT_SECS: u32 = 10;

/// Overpass API interface
#[derive(Clone)]
pub struct OverpassApi {
    client: MapsClient,
}

impl OverpassApi {
    pub(crate) fn new(client: MapsClient) -> Self {
        Self { client }
    }

    /// Ways of the filtered highway classes with full geometry
    pub fn roads(&self, bbox: &BoundingBox, filter: &HighwayFilter) -> ApiResult<Vec<RoadFeature>> {
        let query = build_query(bbox, filter);
        debug!(%query, "overpass query");
        let url = self.client.config().overpass_url.clone();
        let response: OverpassResponse =
            self.client
                .post_form_json("overpass", "pulling road geometry", &url, &[("data", query.as_str())])?;
        Ok(response.into_features())
    }
}

/// Overpass QL for ways matching `filter` inside `bbox`
pub fn build_query(bbox: &BoundingBox, filter: &HighwayFilter) -> String {
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];way[\"highway\"~\"{}\"]({});out geom tags;",
        filter.to_regex(),
        bbox.to_overpass()
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    geometry: Vec<Node>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Node {
    lat: f64,
    lon: f64,
}

impl OverpassResponse {
    fn into_features(self) -> Vec<RoadFeature> {
        if let Some(remark) = &self.remark {
            debug!(%remark, "overpass remark");
        }
        self.elements
            .into_iter()
            .filter(|e| e.kind == "way" && e.geometry.len() >= 2)
            .map(|mut e| RoadFeature {
                coords: e.geometry.iter().map(|n| Coordinate::new(n.lat, n.lon)).collect(),
                name: e.tags.remove("name"),
                base_name: e.tags.remove("tiger:name_base"),
            })
            .collect()
    }
}

impl RoadNetwork for MapsClient {
    fn road_features_in_bbox(&self, bbox: &BoundingBox, filter: &HighwayFilter) -> ProviderResult<Vec<RoadFeature>> {
        Ok(self.overpass().roads(bbox, filter)?)
    }
}

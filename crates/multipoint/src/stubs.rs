//! In-memory collaborators for tests.

use std::cell::RefCell;
use stopscan_core::model::PanoramaId;
use stopscan_core::providers::{
    HighwayFilter, PanoramaMetadata, PanoramaSource, PlaceRecord, PlaceSearch, ProviderError,
    ProviderResult, RoadFeature, RoadNetwork,
};
use stopscan_geo::{BoundingBox, Coordinate, RoadGeometry};

pub fn feature(name: Option<&str>, base_name: Option<&str>, coords: &[(f64, f64)]) -> RoadFeature {
    RoadFeature {
        coords: coords.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)).collect(),
        name: name.map(String::from),
        base_name: base_name.map(String::from),
    }
}

pub struct StubNetwork {
    result: ProviderResult<Vec<RoadFeature>>,
}

impl StubNetwork {
    pub fn new(features: Vec<RoadFeature>) -> Self {
        Self { result: Ok(features) }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self { result: Err(err) }
    }
}

impl RoadNetwork for StubNetwork {
    fn road_features_in_bbox(&self, _bbox: &BoundingBox, _filter: &HighwayFilter) -> ProviderResult<Vec<RoadFeature>> {
        self.result.clone()
    }
}

/// Panorama ids keyed on arc length along a known road.
///
/// Each query is located on `road`, rounded to the nearest meter, and
/// passed to `rule`. The camera is reported exactly at the query point.
pub struct ArcPanoramas<F> {
    road: RoadGeometry,
    rule: F,
    pub probes: RefCell<Vec<f64>>,
}

impl<F> ArcPanoramas<F>
where
    F: Fn(f64) -> ProviderResult<String>,
{
    pub fn new(road: RoadGeometry, rule: F) -> Self {
        Self { road, rule, probes: RefCell::new(Vec::new()) }
    }

    pub fn probed_meters(&self) -> Vec<f64> {
        self.probes.borrow().iter().map(|s| s.round()).collect()
    }
}

impl<F> PanoramaSource for ArcPanoramas<F>
where
    F: Fn(f64) -> ProviderResult<String>,
{
    fn panorama_metadata(&self, at: Coordinate) -> ProviderResult<PanoramaMetadata> {
        let s = self.road.locate_coordinate(&at);
        self.probes.borrow_mut().push(s);
        let id = (self.rule)(s.round())?;
        Ok(PanoramaMetadata {
            pano_id: PanoramaId::new(id),
            coords: at,
            date: Some("2022-05".to_string()),
        })
    }
}

pub struct StubPlaces {
    pub result: ProviderResult<Vec<PlaceRecord>>,
}

impl PlaceSearch for StubPlaces {
    fn nearby_search(&self, _at: Coordinate, _keyword: &str, _radius_m: f64) -> ProviderResult<Vec<PlaceRecord>> {
        self.result.clone()
    }
}

//! Geometry provider: the named road nearest to a point of interest.

use crate::error::{Result, SamplingError};
use geo::{Coord, LineString};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use stopscan_core::providers::{HighwayFilter, RoadFeature, RoadNetwork};
use stopscan_geo::{merge_segments, BoundingBox, Coordinate, Crs, GeoError, Projection, RoadGeometry};
use tracing::debug;

/// One projected segment of a road feature, indexed for nearest lookups.
struct SegmentNode {
    feature: usize,
    a: [f64; 2],
    b: [f64; 2],
}

impl RTreeObject for SegmentNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl PointDistance for SegmentNode {
    fn distance_2(&self, p: &[f64; 2]) -> f64 {
        let (dx, dy) = (self.b[0] - self.a[0], self.b[1] - self.a[1]);
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq > 0.0 {
            (((p[0] - self.a[0]) * dx + (p[1] - self.a[1]) * dy) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (cx, cy) = (self.a[0] + t * dx - p[0], self.a[1] + t * dy - p[1]);
        cx * cx + cy * cy
    }
}

/// Find the road the point of interest sits on.
///
/// Queries vehicular ways within `search_radius_m`, picks the line nearest
/// to `anchor`, then merges every way sharing its name (or TIGER base name)
/// into one connected line in the `crs` frame centred on `anchor`.
///
/// # Errors
/// - [`SamplingError::GeometryNotFound`] when there is no road, the nearest
///   road is unnamed, or its segments do not form a single path
/// - [`SamplingError::Transport`] when the road network query fails
pub fn find_road<N>(network: &N, anchor: Coordinate, search_radius_m: f64, crs: Crs) -> Result<RoadGeometry>
where
    N: RoadNetwork + ?Sized,
{
    let bbox = BoundingBox::around(anchor, search_radius_m);
    debug!(%anchor, bbox = %bbox.to_overpass(), "querying road network");

    let features = network.road_features_in_bbox(&bbox, &HighwayFilter::vehicular())?;
    let projection = Projection::for_crs(crs, anchor);
    let lines: Vec<LineString<f64>> = features
        .iter()
        .map(|f| f.coords.iter().map(|c| projection.forward(c)).collect())
        .collect();

    let nearest = nearest_feature(&lines, projection.forward(&anchor)).ok_or_else(|| {
        SamplingError::GeometryNotFound(format!("no roads within {search_radius_m} m"))
    })?;

    let same_road = road_key(&features[nearest]).ok_or_else(|| {
        SamplingError::GeometryNotFound("couldnt find adjacent road".to_string())
    })?;
    let matching: Vec<LineString<f64>> = features
        .iter()
        .zip(&lines)
        .filter(|(feature, _)| same_road.matches(feature))
        .map(|(_, line)| line.clone())
        .collect();

    debug!(road = %same_road, segments = matching.len(), "merging road segments");
    let merged = merge_segments(&matching).map_err(|e| unusable_road(&same_road, e))?;
    RoadGeometry::new(merged, projection).map_err(|e| unusable_road(&same_road, e))
}

fn nearest_feature(lines: &[LineString<f64>], origin: Coord<f64>) -> Option<usize> {
    let nodes: Vec<SegmentNode> = lines
        .iter()
        .enumerate()
        .flat_map(|(feature, line)| {
            line.0.windows(2).map(move |w| SegmentNode {
                feature,
                a: [w[0].x, w[0].y],
                b: [w[1].x, w[1].y],
            })
        })
        .collect();

    RTree::bulk_load(nodes)
        .nearest_neighbor(&[origin.x, origin.y])
        .map(|node| node.feature)
}

/// How ways belonging to the same road are recognised.
enum RoadKey {
    Name(String),
    BaseName(String),
}

impl RoadKey {
    fn matches(&self, feature: &RoadFeature) -> bool {
        match self {
            RoadKey::Name(name) => feature.name.as_deref() == Some(name),
            RoadKey::BaseName(base) => feature.base_name.as_deref() == Some(base),
        }
    }
}

impl std::fmt::Display for RoadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadKey::Name(name) => f.write_str(name),
            RoadKey::BaseName(base) => write!(f, "{base} (base name)"),
        }
    }
}

fn road_key(feature: &RoadFeature) -> Option<RoadKey> {
    let non_empty = |s: &Option<String>| s.as_ref().filter(|s| !s.trim().is_empty()).cloned();
    non_empty(&feature.name)
        .map(RoadKey::Name)
        .or_else(|| non_empty(&feature.base_name).map(RoadKey::BaseName))
}

fn unusable_road(key: &RoadKey, err: GeoError) -> SamplingError {
    SamplingError::GeometryNotFound(format!("couldnt use road {key}: {err}"))
}

//! Road geometry in a metric frame.
//!
//! A [`RoadGeometry`] is a single connected polyline with precomputed
//! cumulative arc lengths, so projecting a point onto it and interpolating
//! a point at a given distance are both linear-referencing operations in
//! meters.

use crate::{Coordinate, GeoError, Projection, Result};
use geo::{Coord, LineString};
use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Endpoints closer than this (in frame units) are treated as the same vertex.
const SNAP_GRID: f64 = 0.01;

/// A connected road line in a projected metric frame.
#[derive(Debug, Clone)]
pub struct RoadGeometry {
    line: LineString<f64>,
    cumulative: Vec<f64>,
    projection: Projection,
}

impl RoadGeometry {
    /// Wraps a projected line.
    ///
    /// Consecutive duplicate vertices are dropped.
    ///
    /// # Errors
    /// [`GeoError::EmptyGeometry`] if fewer than two distinct vertices remain.
    pub fn new(line: LineString<f64>, projection: Projection) -> Result<Self> {
        let mut coords: Vec<Coord<f64>> = Vec::with_capacity(line.0.len());
        for c in line.0 {
            if coords.last() != Some(&c) {
                coords.push(c);
            }
        }

        if coords.len() < 2 {
            return Err(GeoError::EmptyGeometry(format!(
                "road line needs two distinct vertices, got {}",
                coords.len()
            )));
        }

        let mut cumulative = Vec::with_capacity(coords.len());
        cumulative.push(0.0);
        for pair in coords.windows(2) {
            let last = cumulative[cumulative.len() - 1];
            cumulative.push(last + segment_length(pair[0], pair[1]));
        }

        Ok(Self {
            line: LineString::new(coords),
            cumulative,
            projection,
        })
    }

    /// Projects geographic vertices with `projection` and wraps the result.
    pub fn from_coordinates(coords: &[Coordinate], projection: Projection) -> Result<Self> {
        let line: LineString<f64> = coords.iter().map(|c| projection.forward(c)).collect();
        Self::new(line, projection)
    }

    /// Total length in frame units (meters).
    pub fn length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// The projection this geometry lives in.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// The underlying projected line.
    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Arc length of the point on the road nearest to `point`.
    ///
    /// Ties between segments resolve to the earliest one.
    pub fn locate(&self, point: Coord<f64>) -> f64 {
        let mut best_distance = f64::INFINITY;
        let mut best_arc = 0.0;

        for (i, pair) in self.line.0.windows(2).enumerate() {
            let (t, distance_sq) = project_onto_segment(point, pair[0], pair[1]);
            if distance_sq < best_distance {
                best_distance = distance_sq;
                best_arc = self.cumulative[i] + t * (self.cumulative[i + 1] - self.cumulative[i]);
            }
        }

        best_arc
    }

    /// [`locate`](Self::locate) for a geographic coordinate.
    pub fn locate_coordinate(&self, coord: &Coordinate) -> f64 {
        self.locate(self.projection.forward(coord))
    }

    /// Clamps an arc length into `[0, length]`.
    ///
    /// The flag is true when the result sits on either endpoint.
    pub fn clamp(&self, arc_length: f64) -> (f64, bool) {
        let length = self.length();
        let clamped = arc_length.max(0.0).min(length);
        (clamped, clamped == 0.0 || clamped == length)
    }

    /// Point at `arc_length` along the road, clamped to the endpoints.
    pub fn interpolate(&self, arc_length: f64) -> Coord<f64> {
        let (s, _) = self.clamp(arc_length);
        let coords = &self.line.0;

        // index of the segment whose start is the last vertex at or before s
        let upper = self.cumulative.partition_point(|&c| c <= s);
        let i = upper.saturating_sub(1).min(coords.len() - 2);

        let span = self.cumulative[i + 1] - self.cumulative[i];
        let t = if span > 0.0 { (s - self.cumulative[i]) / span } else { 0.0 };

        let a = coords[i];
        let b = coords[i + 1];
        Coord {
            x: a.x + t * (b.x - a.x),
            y: a.y + t * (b.y - a.y),
        }
    }

    /// [`interpolate`](Self::interpolate) returned in geographic degrees.
    pub fn interpolate_coordinate(&self, arc_length: f64) -> Coordinate {
        self.projection.inverse(self.interpolate(arc_length))
    }
}

/// Joins road segments that share endpoints into one continuous line.
///
/// Segments may appear in any order and orientation. The result starts at
/// a dead end (or anywhere, for a closed loop) and walks every segment once.
///
/// # Errors
/// - [`GeoError::EmptyGeometry`] for no input
/// - [`GeoError::DisconnectedSegments`] when the segments form several pieces
/// - [`GeoError::BranchingSegments`] when three or more segments meet
pub fn merge_segments(segments: &[LineString<f64>]) -> Result<LineString<f64>> {
    let segments: Vec<&LineString<f64>> = segments.iter().filter(|s| s.0.len() >= 2).collect();

    match segments.len() {
        0 => return Err(GeoError::EmptyGeometry("no road segments to merge".into())),
        1 => return Ok(segments[0].clone()),
        _ => {}
    }

    let mut graph: UnGraph<(i64, i64), usize> = UnGraph::new_undirected();
    let mut nodes: HashMap<(i64, i64), NodeIndex> = HashMap::new();
    let mut degree: HashMap<NodeIndex, usize> = HashMap::new();

    for (idx, segment) in segments.iter().enumerate() {
        let mut endpoint = |c: Coord<f64>| {
            let key = snap(c);
            *nodes.entry(key).or_insert_with(|| graph.add_node(key))
        };
        let a = endpoint(segment.0[0]);
        let b = endpoint(segment.0[segment.0.len() - 1]);
        graph.add_edge(a, b, idx);
        *degree.entry(a).or_default() += 1;
        *degree.entry(b).or_default() += 1;
    }

    let components = connected_components(&graph);
    if components > 1 {
        return Err(GeoError::DisconnectedSegments { components });
    }

    let junctions = degree.values().filter(|&&d| d > 2).count();
    if junctions > 0 {
        return Err(GeoError::BranchingSegments { junctions });
    }

    let start = degree
        .iter()
        .filter(|&(_, &d)| d == 1)
        .map(|(&n, _)| n)
        .min()
        .unwrap_or_else(|| NodeIndex::new(0));

    let mut merged: Vec<Coord<f64>> = Vec::new();
    let mut used: HashSet<EdgeIndex> = HashSet::new();
    let mut current = start;

    while let Some(edge) = graph.edges(current).map(|e| e.id()).find(|e| !used.contains(e)) {
        used.insert(edge);
        let segment = segments[graph[edge]];

        let forward = snap(segment.0[0]) == graph[current];
        let coords: Vec<Coord<f64>> = if forward {
            segment.0.clone()
        } else {
            segment.0.iter().rev().copied().collect()
        };

        let skip = usize::from(!merged.is_empty());
        merged.extend(coords.into_iter().skip(skip));

        current = match graph.edge_endpoints(edge) {
            Some((a, b)) if a == current => b,
            Some((a, _)) => a,
            None => break,
        };
    }

    Ok(LineString::new(merged))
}

fn snap(c: Coord<f64>) -> (i64, i64) {
    ((c.x / SNAP_GRID).round() as i64, (c.y / SNAP_GRID).round() as i64)
}

#[inline]
fn segment_length(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Parameter `t` in `[0, 1]` of the closest point on `a..b`, and the squared distance to it.
#[inline]
fn project_onto_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let qx = a.x + t * dx;
    let qy = a.y + t * dy;
    (t, (p.x - qx).powi(2) + (p.y - qy).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn origin() -> Projection {
        Projection::local(Coordinate::new(33.8, -84.4))
    }

    fn line(points: &[(f64, f64)]) -> LineString<f64> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn l_shaped() -> RoadGeometry {
        // 60 m east, then 40 m north
        RoadGeometry::new(line(&[(0.0, 0.0), (60.0, 0.0), (60.0, 40.0)]), origin()).unwrap()
    }

    #[test]
    fn test_length() {
        assert!((l_shaped().length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_line() {
        let result = RoadGeometry::new(line(&[(1.0, 1.0), (1.0, 1.0)]), origin());
        assert!(matches!(result, Err(GeoError::EmptyGeometry(_))));
    }

    #[test]
    fn test_interpolate_on_each_leg() {
        let road = l_shaped();
        assert_eq!(road.interpolate(30.0), Coord { x: 30.0, y: 0.0 });
        assert_eq!(road.interpolate(60.0), Coord { x: 60.0, y: 0.0 });
        assert_eq!(road.interpolate(80.0), Coord { x: 60.0, y: 20.0 });
    }

    #[test]
    fn test_interpolate_clamps() {
        let road = l_shaped();
        assert_eq!(road.interpolate(-5.0), Coord { x: 0.0, y: 0.0 });
        assert_eq!(road.interpolate(500.0), Coord { x: 60.0, y: 40.0 });
    }

    #[test]
    fn test_clamp_reports_boundary() {
        let road = l_shaped();
        assert_eq!(road.clamp(-1.0), (0.0, true));
        assert_eq!(road.clamp(100.0), (100.0, true));
        assert_eq!(road.clamp(150.0), (100.0, true));
        assert_eq!(road.clamp(50.0), (50.0, false));
    }

    #[test]
    fn test_locate_off_road_point() {
        let road = l_shaped();
        // 5 m north of the first leg at x = 25
        assert!((road.locate(Coord { x: 25.0, y: 5.0 }) - 25.0).abs() < 1e-9);
        // beyond the corner, closest to the second leg
        assert!((road.locate(Coord { x: 70.0, y: 30.0 }) - 90.0).abs() < 1e-9);
        // before the start clamps to 0
        assert!(road.locate(Coord { x: -10.0, y: -3.0 }).abs() < 1e-9);
    }

    #[test]
    fn test_geographic_round_trip() {
        let projection = origin();
        let road = RoadGeometry::from_coordinates(
            &[Coordinate::new(33.8, -84.4), Coordinate::new(33.801, -84.4)],
            projection,
        )
        .unwrap();
        assert!((road.length() - 111.19).abs() < 0.1);

        let mid = road.interpolate_coordinate(road.length() / 2.0);
        assert!((mid.latitude - 33.8005).abs() < 1e-9);
        assert!((mid.longitude + 84.4).abs() < 1e-9);
    }

    #[test]
    fn test_merge_out_of_order_and_reversed() {
        let segments = vec![
            line(&[(20.0, 0.0), (30.0, 0.0)]),
            line(&[(10.0, 0.0), (0.0, 0.0)]),
            line(&[(10.0, 0.0), (20.0, 0.0)]),
        ];
        let merged = merge_segments(&segments).unwrap();
        let road = RoadGeometry::new(merged, origin()).unwrap();
        assert!((road.length() - 30.0).abs() < 1e-9);
        assert_eq!(road.line().0.len(), 4);
    }

    #[test]
    fn test_merge_snaps_tiny_gaps() {
        let segments = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(10.001, 0.0), (20.0, 0.0)]),
        ];
        let merged = merge_segments(&segments).unwrap();
        assert_eq!(merged.0.len(), 3);
    }

    #[test]
    fn test_merge_disconnected_is_error() {
        let segments = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(15.0, 0.0), (25.0, 0.0)]),
        ];
        assert!(matches!(
            merge_segments(&segments),
            Err(GeoError::DisconnectedSegments { components: 2 })
        ));
    }

    #[test]
    fn test_merge_fork_is_error() {
        let segments = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(10.0, 0.0), (20.0, 0.0)]),
            line(&[(10.0, 0.0), (10.0, 10.0)]),
        ];
        let err = merge_segments(&segments).unwrap_err();
        assert_eq!(err.code(), crate::GeoErrorCode::UnmergeableSegments);
    }

    #[test]
    fn test_merge_single_and_empty() {
        let one = vec![line(&[(0.0, 0.0), (5.0, 5.0)])];
        assert_eq!(merge_segments(&one).unwrap(), one[0]);
        assert!(merge_segments(&[]).is_err());
    }

    proptest! {
        #[test]
        fn prop_locate_then_interpolate_hits_nearest_point(
            px in -50.0f64..150.0, py in -50.0f64..90.0,
        ) {
            let road = l_shaped();
            let p = Coord { x: px, y: py };
            let arc = road.locate(p);
            let q = road.interpolate(arc);

            // brute-force nearest point over a fine sampling of the road
            let mut best = f64::INFINITY;
            let steps = 100_000;
            for k in 0..=steps {
                let c = road.interpolate(road.length() * k as f64 / steps as f64);
                best = best.min((c.x - p.x).hypot(c.y - p.y));
            }
            let found = (q.x - p.x).hypot(q.y - p.y);
            prop_assert!(found <= best + 0.01);
            prop_assert!((road.locate(q) - arc).abs() <= 0.01);
        }
    }
}

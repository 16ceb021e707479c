//! Fixed-interval vantage point sampling along a road.
//!
//! The anchor (the point of interest) is projected onto the road, then
//! points are walked `interval_m` apart in both directions. Offsets that
//! would fall off the road settle on the nearest endpoint.

use crate::{Coordinate, GeoError, Result, RoadGeometry};

/// Clamped arc lengths for offsets `-before..=after` around `anchor`.
///
/// Index `before` holds the anchor's own projection.
///
/// # Errors
/// [`GeoError::InvalidInterval`] unless `interval_m` is finite and positive.
pub fn sample_arc_lengths(
    road: &RoadGeometry,
    anchor: &Coordinate,
    before: u32,
    after: u32,
    interval_m: f64,
) -> Result<Vec<f64>> {
    if !interval_m.is_finite() || interval_m <= 0.0 {
        return Err(GeoError::InvalidInterval(interval_m));
    }

    let start = road.locate_coordinate(anchor);
    let before = i64::from(before);
    let after = i64::from(after);

    Ok((-before..=after)
        .map(|i| road.clamp(start + i as f64 * interval_m).0)
        .collect())
}

/// Candidate vantage coordinates along `road`, ordered by offset.
///
/// Returns exactly `before + after + 1` coordinates in geographic degrees:
/// the `before` points behind the anchor first, the anchor's projection at
/// index `before`, then the `after` points ahead of it.
///
/// # Example
/// ```
/// use stopscan_geo::{sample_points, Coordinate, Projection, RoadGeometry};
///
/// let stop = Coordinate::new(33.8, -84.4);
/// let road = RoadGeometry::from_coordinates(
///     &[Coordinate::new(33.799, -84.4001), Coordinate::new(33.801, -84.4001)],
///     Projection::local(stop),
/// ).unwrap();
///
/// let points = sample_points(&road, &stop, 2, 2, 15.0).unwrap();
/// assert_eq!(points.len(), 5);
/// ```
pub fn sample_points(
    road: &RoadGeometry,
    anchor: &Coordinate,
    before: u32,
    after: u32,
    interval_m: f64,
) -> Result<Vec<Coordinate>> {
    let arcs = sample_arc_lengths(road, anchor, before, after, interval_m)?;
    Ok(arcs.into_iter().map(|s| road.interpolate_coordinate(s)).collect())
}

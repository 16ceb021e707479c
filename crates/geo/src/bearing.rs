//! Camera heading math.
//!
//! Two bearings are offered. [`bearing_to_target`] is the great-circle
//! forward azimuth between geographic coordinates and is what vantage
//! headings use. [`bearing_between_projected`] works on points that already
//! live in a planar metric frame.
//!
//! Both return compass bearings: degrees clockwise from north, normalized
//! with `(θ + 360) mod 360` into `[0, 360)`.

use crate::{Coordinate, GeoError, Result};
use geo::Coord;

/// Forward azimuth from `from` toward `to`, in degrees within `[0, 360)`.
///
/// This is the heading a camera standing at `from` must face to look at `to`.
///
/// # Errors
/// Returns [`GeoError::DegenerateBearing`] when both coordinates are equal.
///
/// # Example
/// ```
/// use stopscan_geo::{bearing_to_target, Coordinate};
///
/// let camera = Coordinate::new(0.0, 0.0);
/// let east = Coordinate::new(0.0, 0.001);
/// assert!((bearing_to_target(&camera, &east).unwrap() - 90.0).abs() < 1e-9);
/// ```
pub fn bearing_to_target(from: &Coordinate, to: &Coordinate) -> Result<f64> {
    if from == to {
        return Err(GeoError::DegenerateBearing(from.to_string()));
    }

    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();
    let d_lon = lon2 - lon1;

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    Ok(normalize(x.atan2(y).to_degrees()))
}

/// Planar bearing from `p1` toward `p2`, in degrees within `[0, 360)`.
///
/// Coordinates are `x` = easting, `y` = northing. The angle is measured
/// clockwise from grid north (`atan2(Δx, Δy)`), which agrees with
/// [`bearing_to_target`] up to grid convergence.
///
/// # Errors
/// Returns [`GeoError::DegenerateBearing`] when both points are equal.
pub fn bearing_between_projected(p1: Coord<f64>, p2: Coord<f64>) -> Result<f64> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    if dx == 0.0 && dy == 0.0 {
        return Err(GeoError::DegenerateBearing(format!("{},{}", p1.x, p1.y)));
    }

    Ok(normalize(dx.atan2(dy).to_degrees()))
}

/// Maps any finite angle in degrees into `[0, 360)`.
///
/// Used for stitched captures where headings are stepped past 360 or below 0.
pub fn normalize_heading(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    normalize(wrapped)
}

/// `(θ + 360) mod 360` for `θ` in `(-360, 360)`.
#[inline]
fn normalize(theta: f64) -> f64 {
    let heading = (theta + 360.0) % 360.0;
    // rounding can land exactly on 360 for tiny negative angles
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

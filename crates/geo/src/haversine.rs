//! Haversine distance calculation.
//!
//! Used to report how far a resolved panorama sits from the point that was
//! requested, and as the reference distance when checking projections.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Example
/// ```
/// use stopscan_geo::{haversine_distance, Coordinate};
///
/// let midtown = Coordinate::new(33.7812, -84.3830);
/// let downtown = Coordinate::new(33.7537, -84.3901);
///
/// let distance = haversine_distance(&midtown, &downtown);
/// assert!((distance - 3.1).abs() < 0.2);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDTOWN: Coordinate = Coordinate { latitude: 33.7812, longitude: -84.3830 };
    const DOWNTOWN: Coordinate = Coordinate { latitude: 33.7537, longitude: -84.3901 };

    #[test]
    fn test_midtown_to_downtown() {
        let distance = haversine_distance(&MIDTOWN, &DOWNTOWN);
        assert!((distance - 3.1).abs() < 0.2, "Midtown-Downtown: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        let distance = haversine_distance_meters(&MIDTOWN, &MIDTOWN);
        assert!(distance.abs() < 1e-6);
    }

    #[test]
    fn test_symmetry() {
        let d1 = haversine_distance(&MIDTOWN, &DOWNTOWN);
        let d2 = haversine_distance(&DOWNTOWN, &MIDTOWN);
        assert!((d1 - d2).abs() < 0.001);
    }

    #[test]
    fn test_meters_conversion() {
        let km = haversine_distance(&MIDTOWN, &DOWNTOWN);
        let meters = haversine_distance_meters(&MIDTOWN, &DOWNTOWN);
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let meters = haversine_distance_meters(&a, &b);
        assert!((meters - 111_195.0).abs() < 10.0);
    }
}

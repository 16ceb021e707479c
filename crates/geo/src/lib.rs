//! Geospatial core for stopscan.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Forward-azimuth and planar bearings for camera headings
//! - Projections between geographic degrees and a metric frame
//! - Road geometry with arc-length projection, interpolation and segment merging
//! - Fixed-interval vantage point sampling along a road
//! - GeoJSON / WKT point parsing
//!
//! # Example
//!
//! ```
//! use stopscan_geo::{bearing_to_target, Coordinate};
//!
//! let camera = Coordinate::new(33.8387, -84.3690);
//! let stop = Coordinate::new(33.8390, -84.3690); // due north
//!
//! let heading = bearing_to_target(&camera, &stop).unwrap();
//! assert!(heading < 0.01 || heading > 359.99);
//! ```

pub mod bearing;
mod error;
mod geojson;
mod haversine;
pub mod projection;
pub mod road;
pub mod sampler;

pub use bearing::{bearing_between_projected, bearing_to_target, normalize_heading};
pub use error::{GeoError, GeoErrorCode, Result};
pub use geojson::parse_point;
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use projection::{BoundingBox, Crs, Projection};
pub use road::{merge_segments, RoadGeometry};
pub use sampler::{sample_arc_lengths, sample_points};

use std::fmt;
use std::str::FromStr;

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Renders as `lat,lon`, the form the mapping APIs take as a `location` parameter.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| GeoError::InvalidCoordinate(format!("expected 'lat,lon', got: {s}")))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidCoordinate(format!("Invalid latitude: {lat}")))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidCoordinate(format!("Invalid longitude: {lon}")))?;

        let coord = Coordinate::new(latitude, longitude);
        if !coord.is_valid() {
            return Err(GeoError::InvalidCoordinate(format!("out of range: {s}")));
        }
        Ok(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(33.838752, -84.368854);
        assert_eq!(coord.latitude, 33.838752);
        assert_eq!(coord.longitude, -84.368854);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (33.8387, -84.3688).into();
        assert_eq!(coord.latitude, 33.8387);
    }

    #[test]
    fn test_display_is_api_location_format() {
        let coord = Coordinate::new(33.5, -84.25);
        assert_eq!(coord.to_string(), "33.5,-84.25");
    }

    #[test]
    fn test_parse_from_str() {
        let coord: Coordinate = " 33.5 , -84.25 ".parse().unwrap();
        assert_eq!(coord, Coordinate::new(33.5, -84.25));

        assert!("33.5".parse::<Coordinate>().is_err());
        assert!("abc,1".parse::<Coordinate>().is_err());
        assert!("95,1".parse::<Coordinate>().is_err());
    }
}

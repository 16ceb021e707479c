//! Projections between geographic degrees and a metric plane.
//!
//! Distances along a road must be measured in meters, never in degrees. Two
//! frames are supported:
//!
//! - [`Crs::Local`]: an equirectangular tangent plane centered on the point
//!   of interest. Distances are true meters to well under 0.1% within a few
//!   kilometers of the origin, which covers any search radius used here.
//! - [`Crs::WebMercator`]: EPSG:3857. Units are "meters" at the equator only;
//!   at latitude φ one unit is `cos φ` ground meters.

use crate::{Coordinate, EARTH_RADIUS_M};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// WGS84 semi-major axis, the sphere radius EPSG:3857 uses.
const WEB_MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Which metric frame to sample in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Crs {
    /// Tangent plane at the point of interest
    #[default]
    Local,
    /// Spherical Web Mercator (EPSG:3857)
    WebMercator,
}

/// A concrete projection, ready to convert coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Equirectangular plane with its origin at `origin`
    LocalTangent {
        /// Point mapped to (0, 0)
        origin: Coordinate,
    },
    /// EPSG:3857
    WebMercator,
}

impl Projection {
    /// Tangent-plane projection centered on `origin`.
    pub fn local(origin: Coordinate) -> Self {
        Projection::LocalTangent { origin }
    }

    /// Builds the projection for a configured CRS around `origin`.
    pub fn for_crs(crs: Crs, origin: Coordinate) -> Self {
        match crs {
            Crs::Local => Projection::local(origin),
            Crs::WebMercator => Projection::WebMercator,
        }
    }

    /// Geographic degrees to planar `(x = easting, y = northing)`.
    pub fn forward(&self, coord: &Coordinate) -> Coord<f64> {
        match self {
            Projection::LocalTangent { origin } => {
                let cos_lat0 = origin.latitude.to_radians().cos();
                Coord {
                    x: EARTH_RADIUS_M * (coord.longitude - origin.longitude).to_radians() * cos_lat0,
                    y: EARTH_RADIUS_M * (coord.latitude - origin.latitude).to_radians(),
                }
            }
            Projection::WebMercator => {
                let lat = coord.latitude.to_radians();
                Coord {
                    x: WEB_MERCATOR_RADIUS_M * coord.longitude.to_radians(),
                    y: WEB_MERCATOR_RADIUS_M * (FRAC_PI_4 + lat / 2.0).tan().ln(),
                }
            }
        }
    }

    /// Planar coordinates back to geographic degrees.
    pub fn inverse(&self, point: Coord<f64>) -> Coordinate {
        match self {
            Projection::LocalTangent { origin } => {
                let cos_lat0 = origin.latitude.to_radians().cos();
                Coordinate::new(
                    origin.latitude + (point.y / EARTH_RADIUS_M).to_degrees(),
                    origin.longitude + (point.x / (EARTH_RADIUS_M * cos_lat0)).to_degrees(),
                )
            }
            Projection::WebMercator => {
                let lat = 2.0 * (point.y / WEB_MERCATOR_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4;
                Coordinate::new(
                    lat.to_degrees(),
                    (point.x / WEB_MERCATOR_RADIUS_M).to_degrees(),
                )
            }
        }
    }
}

/// A geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude
    pub south: f64,
    /// Minimum longitude
    pub west: f64,
    /// Maximum latitude
    pub north: f64,
    /// Maximum longitude
    pub east: f64,
}

impl BoundingBox {
    /// Square box extending `radius_m` meters from `center` in every direction.
    ///
    /// The square is laid out in the center's tangent plane, so the radius is
    /// honored in meters regardless of latitude.
    pub fn around(center: Coordinate, radius_m: f64) -> Self {
        let projection = Projection::local(center);
        let south_west = projection.inverse(Coord { x: -radius_m, y: -radius_m });
        let north_east = projection.inverse(Coord { x: radius_m, y: radius_m });

        Self {
            south: south_west.latitude,
            west: south_west.longitude,
            north: north_east.latitude,
            east: north_east.longitude,
        }
    }

    /// Overpass QL bbox filter: `south,west,north,east`.
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance_meters;

    const STOP: Coordinate = Coordinate { latitude: 33.838752, longitude: -84.368854 };

    #[test]
    fn test_local_origin_maps_to_zero() {
        let projection = Projection::local(STOP);
        let p = projection.forward(&STOP);
        assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);
    }

    #[test]
    fn test_local_round_trip() {
        let projection = Projection::local(STOP);
        let other = Coordinate::new(33.8401, -84.3702);
        let back = projection.inverse(projection.forward(&other));
        assert!((back.latitude - other.latitude).abs() < 1e-12);
        assert!((back.longitude - other.longitude).abs() < 1e-12);
    }

    #[test]
    fn test_local_distances_are_meters() {
        let projection = Projection::local(STOP);
        let other = Coordinate::new(33.8401, -84.3702);
        let a = projection.forward(&STOP);
        let b = projection.forward(&other);
        let planar = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let great_circle = haversine_distance_meters(&STOP, &other);
        assert!((planar - great_circle).abs() / great_circle < 1e-3);
    }

    #[test]
    fn test_web_mercator_round_trip() {
        let projection = Projection::WebMercator;
        let p = projection.forward(&STOP);
        let back = projection.inverse(p);
        assert!((back.latitude - STOP.latitude).abs() < 1e-9);
        assert!((back.longitude - STOP.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_scale_factor() {
        // one web-mercator unit is cos(lat) ground meters
        let projection = Projection::WebMercator;
        let a = projection.forward(&STOP);
        let b = projection.forward(&Coordinate::new(STOP.latitude, STOP.longitude + 0.001));
        let ground = haversine_distance_meters(
            &STOP,
            &Coordinate::new(STOP.latitude, STOP.longitude + 0.001),
        );
        let scale = ground / (b.x - a.x);
        assert!((scale - STOP.latitude.to_radians().cos()).abs() < 2e-3);
    }

    #[test]
    fn test_bounding_box_radius() {
        let bbox = BoundingBox::around(STOP, 200.0);
        assert!(bbox.south < STOP.latitude && STOP.latitude < bbox.north);
        assert!(bbox.west < STOP.longitude && STOP.longitude < bbox.east);

        let north_edge = Coordinate::new(bbox.north, STOP.longitude);
        let d = haversine_distance_meters(&STOP, &north_edge);
        assert!((d - 200.0).abs() < 0.5, "north edge at {d} m");

        let east_edge = Coordinate::new(STOP.latitude, bbox.east);
        let d = haversine_distance_meters(&STOP, &east_edge);
        assert!((d - 200.0).abs() < 0.5, "east edge at {d} m");
    }

    #[test]
    fn test_overpass_bbox_order() {
        let bbox = BoundingBox { south: 1.0, west: 2.0, north: 3.0, east: 4.0 };
        assert_eq!(bbox.to_overpass(), "1,2,3,4");
    }

    #[test]
    fn test_crs_serde_names() {
        let crs: Crs = serde_json::from_str("\"web-mercator\"").unwrap();
        assert_eq!(crs, Crs::WebMercator);
        assert_eq!(Crs::default(), Crs::Local);
    }
}

//! Point parsing for stop inventories.
//!
//! Supports parsing coordinates from:
//! - GeoJSON geometry: `{"type": "Point", "coordinates": [lng, lat]}`
//! - WKT string: `POINT(lng lat)`

use crate::{Coordinate, GeoError, Result};

/// Parse a point from a JSON value.
///
/// Returns `None` for null, non-point or malformed values, and for
/// coordinates outside the valid latitude/longitude range.
///
/// # Example
/// ```
/// use stopscan_geo::parse_point;
/// use serde_json::json;
///
/// let geojson = json!({"type": "Point", "coordinates": [-84.368854, 33.838752]});
/// let coord = parse_point(&geojson).unwrap();
/// assert!((coord.latitude - 33.838752).abs() < 1e-9);
///
/// let wkt = json!("POINT(-84.368854 33.838752)");
/// assert_eq!(parse_point(&wkt), Some(coord));
/// ```
pub fn parse_point(value: &serde_json::Value) -> Option<Coordinate> {
    if value.is_null() {
        return None;
    }

    if value.is_object() {
        if let Some(kind) = value.get("type").and_then(|t| t.as_str()) {
            if kind != "Point" {
                return None;
            }
        }
        if let Some(coords) = value.get("coordinates").and_then(|c| c.as_array()) {
            if coords.len() >= 2 {
                let lng = coords[0].as_f64()?;
                let lat = coords[1].as_f64()?;
                let coord = Coordinate::new(lat, lng);
                return coord.is_valid().then_some(coord);
            }
        }
        return None;
    }

    if let Some(wkt) = value.as_str() {
        return parse_wkt_point(wkt).ok().filter(Coordinate::is_valid);
    }

    None
}

/// Parse a WKT POINT string.
///
/// Format: `POINT(longitude latitude)`
fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();

    if !wkt.starts_with("POINT(") && !wkt.starts_with("POINT (") {
        return Err(GeoError::InvalidWkt(format!("Expected POINT, got: {}", wkt)));
    }

    let start = wkt.find('(').ok_or_else(|| GeoError::InvalidWkt("Missing '('".into()))?;
    let end = wkt.find(')').ok_or_else(|| GeoError::InvalidWkt("Missing ')'".into()))?;

    if start >= end {
        return Err(GeoError::InvalidWkt("Invalid parentheses".into()));
    }

    let parts: Vec<&str> = wkt[start + 1..end].split_whitespace().collect();
    if parts.len() != 2 {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    }

    let lng: f64 = parts[0]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", parts[0])))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", parts[1])))?;

    Ok(Coordinate::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_geojson_point() {
        let value = json!({"type": "Point", "coordinates": [-84.368854, 33.838752]});
        let coord = parse_point(&value).unwrap();
        assert!((coord.latitude - 33.838752).abs() < 1e-9);
        assert!((coord.longitude + 84.368854).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geojson_without_type() {
        let value = json!({"coordinates": [-84.37, 33.84]});
        assert!(parse_point(&value).is_some());
    }

    #[test]
    fn test_rejects_other_geometry_types() {
        let value = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        assert!(parse_point(&value).is_none());
    }

    #[test]
    fn test_parse_wkt_with_space() {
        let value = json!("POINT (-84.37 33.84)");
        let coord = parse_point(&value).unwrap();
        assert!((coord.latitude - 33.84).abs() < 1e-9);
    }

    #[test]
    fn test_parse_null_returns_none() {
        assert!(parse_point(&json!(null)).is_none());
    }

    #[test]
    fn test_parse_invalid_wkt() {
        assert!(parse_wkt_point("POLYGON((0 0, 1 1, 1 0, 0 0))").is_err());
        assert!(parse_wkt_point("POINT(1)").is_err());
    }

    #[test]
    fn test_swapped_axes_out_of_range() {
        // [lat, lng] order by mistake: -120 is not a latitude
        let value = json!({"coordinates": [33.84, -120.0]});
        assert!(parse_point(&value).is_none());
    }
}

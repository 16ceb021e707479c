//! Stop inventory loading from GeoJSON.

use crate::error::{Error, Result, ResultExt};
use crate::model::PointOfInterest;
use serde_json::Value;
use std::path::Path;
use stopscan_geo::parse_point;
use tracing::{debug, warn};

/// Read a FeatureCollection of Point features into points of interest.
///
/// Ids come from `id_property` when given, then the feature `id`, then
/// the feature's position in the collection. Features without a valid
/// point are skipped with a warning.
pub fn load_stops(path: impl AsRef<Path>, id_property: Option<&str>) -> Result<Vec<PointOfInterest>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| Error::invalid_stops(format!("Invalid JSON: {e}")))
        .context(format!("While reading {}", path.display()))?;
    parse_stops(&value, id_property)
}

/// Parse an in-memory FeatureCollection. See [`load_stops`].
pub fn parse_stops(collection: &Value, id_property: Option<&str>) -> Result<Vec<PointOfInterest>> {
    if collection.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(Error::invalid_stops("Expected a GeoJSON FeatureCollection"));
    }
    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::invalid_stops("FeatureCollection has no features array"))?;

    let mut stops = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let id = feature_id(feature, id_property).unwrap_or_else(|| index.to_string());
        let Some(coords) = feature.get("geometry").and_then(parse_point) else {
            warn!(stop = %id, "skipping feature without a valid point geometry");
            continue;
        };
        stops.push(PointOfInterest::new(id, coords));
    }

    debug!(count = stops.len(), total = features.len(), "loaded stops");
    Ok(stops)
}

fn feature_id(feature: &Value, id_property: Option<&str>) -> Option<String> {
    let from_property = id_property.and_then(|name| feature.get("properties")?.get(name));
    from_property
        .and_then(id_string)
        .or_else(|| feature.get("id").and_then(id_string))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;
    use std::io::Write;

    fn collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "f-1",
                    "properties": {"stop_id": 901234},
                    "geometry": {"type": "Point", "coordinates": [-84.3880, 33.7490]}
                },
                {
                    "type": "Feature",
                    "id": "f-2",
                    "properties": {},
                    "geometry": "POINT(-84.3900 33.7500)"
                },
                {
                    "type": "Feature",
                    "properties": {"stop_id": "broken"},
                    "geometry": null
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [-84.3910, 33.7510]}
                }
            ]
        })
    }

    #[test]
    fn test_id_fallback_chain() {
        let stops = parse_stops(&collection(), Some("stop_id")).unwrap();
        let ids: Vec<&str> = stops.iter().map(PointOfInterest::id).collect();
        assert_eq!(ids, ["901234", "f-2", "3"]);
    }

    #[test]
    fn test_without_id_property() {
        let stops = parse_stops(&collection(), None).unwrap();
        assert_eq!(stops[0].id(), "f-1");
        assert!((stops[1].coords.latitude - 33.75).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = parse_stops(&json!({"type": "Feature"}), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStops);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", collection()).unwrap();
        let stops = load_stops(file.path(), Some("stop_id")).unwrap();
        assert_eq!(stops.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_stops("/nonexistent/stops.geojson", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }
}

//! `stopscan heading`: camera heading between two coordinates.

use super::Context;
use anyhow::Result;
use serde::Serialize;
use stopscan_cli::output::{format_distance, format_heading, Status};
use stopscan_core::exit_codes;
use stopscan_geo::{bearing_between_projected, bearing_to_target, haversine_distance_meters, Coordinate, Crs, Projection};

#[derive(Debug, Serialize)]
struct HeadingOutput {
    from: Coordinate,
    to: Coordinate,
    heading: f64,
    distance_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    planar_heading: Option<f64>,
}

/// Parse `lat,lon` into a validated coordinate.
pub fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    value.parse::<Coordinate>().map_err(|e| e.to_string())
}

pub fn run(ctx: &Context, from: Coordinate, to: Coordinate, crs: Option<Crs>) -> Result<i32> {
    let heading = bearing_to_target(&from, &to)?;
    let planar_heading = crs
        .map(|crs| {
            let projection = Projection::for_crs(crs, from);
            bearing_between_projected(projection.forward(&from), projection.forward(&to))
        })
        .transpose()?;

    let output = HeadingOutput {
        from,
        to,
        heading,
        distance_m: haversine_distance_meters(&from, &to),
        planar_heading,
    };

    if ctx.json {
        ctx.print_json(&output)?;
    } else {
        Status::success(&format!("heading {}", format_heading(output.heading)));
        Status::info(&format!("distance {}", format_distance(output.distance_m)));
        if let Some(planar) = output.planar_heading {
            Status::info(&format!("planar {}", format_heading(planar)));
        }
    }
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let c = parse_coordinate("33.838752, -84.368854").unwrap();
        assert!((c.latitude - 33.838752).abs() < 1e-12);
        assert!((c.longitude + 84.368854).abs() < 1e-12);
    }

    #[test]
    fn test_parse_coordinate_errors() {
        assert!(parse_coordinate("33.8").unwrap_err().contains("lat,lon"));
        assert!(parse_coordinate("north,-84.3").unwrap_err().contains("latitude"));
        assert!(parse_coordinate("-84.3,133.8").is_ok());
        assert!(parse_coordinate("133.8,-84.3").unwrap_err().contains("range"));
    }
}

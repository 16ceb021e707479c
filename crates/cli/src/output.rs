//! Terminal output for pipeline runs.

use owo_colors::OwoColorize;
use stopscan_core::model::PointOfInterest;
use stopscan_core::Error;

/// Status message helpers
pub struct Status;

impl Status {
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a workspace error with its code, context and suggestion
    pub fn report(err: &Error) {
        eprintln!("{} {} {}", "✗".red(), err.code.to_string().dimmed(), err.message);
        if let Some(context) = &err.context {
            eprintln!("  {} {}", "context:".dimmed(), context);
        }
        if let Some(suggestion) = &err.suggestion {
            eprintln!("  {} {}", "hint:".cyan(), suggestion);
        }
    }
}

/// One-line outcome of a stop: pictures taken and errors recorded.
pub fn poi_summary(poi: &PointOfInterest) -> String {
    let pictures = format_count(poi.vantages().len(), "vantage", "vantages");
    match poi.errors() {
        [] => format!("{} {}", poi.id(), pictures),
        [first, rest @ ..] if rest.is_empty() => format!("{} {} ({})", poi.id(), pictures, first),
        errors => format!("{} {} ({} errors)", poi.id(), pictures, errors.len()),
    }
}

/// Eight-point compass name for a heading in degrees.
pub fn compass_point(heading: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = ((heading.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    POINTS[index]
}

/// Format a heading for display, e.g. `112.5° SE`
pub fn format_heading(heading: f64) -> String {
    format!("{:.1}° {}", heading, compass_point(heading))
}

pub fn format_distance(meters: f64) -> String {
    if meters.abs() >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.1} m", meters)
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stopscan_core::model::{PoiError, PoiErrorKind, Vantage};
    use stopscan_geo::Coordinate;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(44.0), "NE");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(292.6), "NW");
    }

    #[test]
    fn test_format_heading() {
        assert_eq!(format_heading(90.0), "90.0° E");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(6.0), "6.0 m");
        assert_eq!(format_distance(1530.0), "1.53 km");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "stop", "stops"), "1 stop");
        assert_eq!(format_count(5, "stop", "stops"), "5 stops");
    }

    #[test]
    fn test_poi_summary() {
        let mut poi = PointOfInterest::new("907", Coordinate::new(33.8, -84.4));
        poi.add_vantage(Vantage::new(Coordinate::new(33.8, -84.4001)));
        assert_eq!(poi_summary(&poi), "907 1 vantage");

        poi.record_error(PoiError::new(PoiErrorKind::RoadEndReached, "incrementing a multipoint", "Hit end of road"));
        assert_eq!(poi_summary(&poi), "907 1 vantage (Hit end of road while incrementing a multipoint.)");
    }
}

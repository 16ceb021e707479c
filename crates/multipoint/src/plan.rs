//! Offline vantage planning straight from road geometry.

use crate::autospacer::{heading_toward, SamplingOptions};
use crate::error::Result;
use stopscan_core::model::{PointOfInterest, Vantage};
use stopscan_geo::{sample_points, RoadGeometry};

/// Add one vantage per sampled road point to `poi`, each facing the stop.
///
/// No imagery provider is consulted, so vantages carry no panorama id and
/// nearby offsets may collapse onto the same endpoint. Returns the number
/// of vantages added.
pub fn plan_vantages(poi: &mut PointOfInterest, road: &RoadGeometry, options: &SamplingOptions) -> Result<usize> {
    options.validate()?;
    let points = sample_points(road, &poi.coords, options.before, options.after, options.min_interval_m)?;

    for (coords, offset) in points.iter().zip(options.offsets()) {
        let mut vantage = Vantage::new(*coords).with_offset(offset);
        vantage.heading = heading_toward(poi, &vantage);
        poi.add_vantage(vantage);
    }

    Ok(points.len())
}

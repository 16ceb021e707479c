//! Redundancy-avoiding multipoint sampling.
//!
//! Each requested offset starts at its nominal distance along the road and
//! is nudged forward by `add_interval_m` until the imagery provider returns
//! a panorama nobody in the session has used yet. Clamping at the road
//! end guarantees every offset terminates.

use crate::error::{Result, SamplingError};
use crate::road::find_road;
use stopscan_core::config::SamplingSection;
use stopscan_core::model::{PoiError, PoiErrorKind, PointOfInterest, Vantage};
use stopscan_core::providers::{PanoramaSource, RoadNetwork};
use stopscan_core::session::UsedPanoramas;
use stopscan_geo::{bearing_to_target, Crs, RoadGeometry};
use tracing::{debug, info};

const INCREMENT_CONTEXT: &str = "incrementing a multipoint";
const MULTIPOINT_CONTEXT: &str = "attempting to run multipoint";

/// Parameters for one multipoint run.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOptions {
    pub before: u32,
    pub after: u32,
    /// Nominal spacing between offsets, in meters
    pub min_interval_m: f64,
    /// Step used to move past an already-used panorama, in meters
    pub add_interval_m: f64,
    pub search_radius_m: f64,
    pub crs: Crs,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self::from(&SamplingSection::default())
    }
}

impl From<&SamplingSection> for SamplingOptions {
    fn from(section: &SamplingSection) -> Self {
        Self {
            before: section.before,
            after: section.after,
            min_interval_m: section.min_interval_m,
            add_interval_m: section.add_interval_m,
            search_radius_m: section.search_radius_m,
            crs: section.crs,
        }
    }
}

impl SamplingOptions {
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_interval_m) {
            return Err(SamplingError::InvalidOptions(format!(
                "min_interval_m must be positive, got {}",
                self.min_interval_m
            )));
        }
        if !positive(self.add_interval_m) {
            return Err(SamplingError::InvalidOptions(format!(
                "add_interval_m must be positive, got {}",
                self.add_interval_m
            )));
        }
        if !positive(self.search_radius_m) {
            return Err(SamplingError::InvalidOptions(format!(
                "search_radius_m must be positive, got {}",
                self.search_radius_m
            )));
        }
        for (name, count) in [("before", self.before), ("after", self.after)] {
            if i32::try_from(count).is_err() {
                return Err(SamplingError::InvalidOptions(format!(
                    "{name} must be at most {}, got {count}",
                    i32::MAX
                )));
            }
        }
        Ok(())
    }

    /// Offset indices `-before..=after` in road order.
    ///
    /// Counts above `i32::MAX` saturate; [`validate`](Self::validate) rejects them.
    pub fn offsets(&self) -> std::ops::RangeInclusive<i32> {
        let before = i32::try_from(self.before).unwrap_or(i32::MAX);
        let after = i32::try_from(self.after).unwrap_or(i32::MAX);
        -before..=after
    }

    /// Offsets in probe order: the main point first, then `-before..=after`
    pub fn probe_order(&self) -> impl Iterator<Item = i32> {
        std::iter::once(0).chain(self.offsets().filter(|&i| i != 0))
    }
}

/// How a single offset ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetOutcome {
    /// A fresh panorama was found after `probes` lookups
    Accepted { probes: u32 },
    /// Every candidate up to the road end was taken
    RoadEnd,
    /// The provider failed or had no imagery
    Failed,
}

/// Tally of one point of interest's offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingReport {
    pub accepted: usize,
    pub road_end: usize,
    pub failed: usize,
}

impl SamplingReport {
    fn record(&mut self, outcome: OffsetOutcome) {
        match outcome {
            OffsetOutcome::Accepted { .. } => self.accepted += 1,
            OffsetOutcome::RoadEnd => self.road_end += 1,
            OffsetOutcome::Failed => self.failed += 1,
        }
    }
}

/// Drives the probe loop against a panorama source.
pub struct Autospacer<'a, P: ?Sized> {
    panoramas: &'a P,
    options: SamplingOptions,
}

impl<'a, P> Autospacer<'a, P>
where
    P: PanoramaSource + ?Sized,
{
    /// # Errors
    /// [`SamplingError::InvalidOptions`] for non-positive intervals or radius.
    pub fn new(panoramas: &'a P, options: SamplingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { panoramas, options })
    }

    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }

    /// Locate the road near `poi` and sample it.
    ///
    /// Road lookup failures are recorded on `poi` and yield an empty report;
    /// they never abort the caller's batch.
    pub fn sample<N>(&self, network: &N, poi: &mut PointOfInterest, used: &mut UsedPanoramas) -> SamplingReport
    where
        N: RoadNetwork + ?Sized,
    {
        let road = match find_road(network, poi.coords, self.options.search_radius_m, self.options.crs) {
            Ok(road) => road,
            Err(e) => {
                poi.record_error(PoiError::new(e.kind(), MULTIPOINT_CONTEXT, e.to_string()));
                return SamplingReport::default();
            }
        };
        self.sample_road(poi, &road, used)
    }

    /// Sample vantages along an already-resolved road.
    pub fn sample_road(&self, poi: &mut PointOfInterest, road: &RoadGeometry, used: &mut UsedPanoramas) -> SamplingReport {
        let anchor = road.locate_coordinate(&poi.coords);
        let mut report = SamplingReport::default();

        for offset in self.options.probe_order() {
            let outcome = self.resolve_offset(poi, road, anchor, offset, used);
            debug!(poi = poi.id(), offset, ?outcome, "offset resolved");
            report.record(outcome);
        }

        info!(
            poi = poi.id(),
            accepted = report.accepted,
            road_end = report.road_end,
            failed = report.failed,
            "multipoint finished"
        );
        report
    }

    fn resolve_offset(
        &self,
        poi: &mut PointOfInterest,
        road: &RoadGeometry,
        anchor: f64,
        offset: i32,
        used: &mut UsedPanoramas,
    ) -> OffsetOutcome {
        let nominal = anchor + f64::from(offset) * self.options.min_interval_m;
        let mut k: u32 = 0;

        loop {
            let (candidate, at_boundary) = road.clamp(nominal + f64::from(k) * self.options.add_interval_m);
            let location = road.interpolate_coordinate(candidate);
            debug!(poi = poi.id(), offset, candidate, %location, "probing panorama");

            let metadata = match self.panoramas.panorama_metadata(location) {
                Ok(metadata) => metadata,
                Err(e) => {
                    poi.record_error(PoiError::new(e.kind(), INCREMENT_CONTEXT, e.to_string()));
                    return OffsetOutcome::Failed;
                }
            };

            if used.reserve(&metadata.pano_id) {
                let mut vantage = Vantage::new(metadata.coords).with_offset(offset);
                vantage.pano_id = Some(metadata.pano_id);
                vantage.date = metadata.date;
                vantage.heading = heading_toward(poi, &vantage);
                poi.add_vantage(vantage);
                return OffsetOutcome::Accepted { probes: k + 1 };
            }

            if at_boundary {
                poi.record_error(PoiError::new(PoiErrorKind::RoadEndReached, INCREMENT_CONTEXT, "Hit end of road"));
                return OffsetOutcome::RoadEnd;
            }
            k += 1;
        }
    }
}

/// Compass heading from a vantage to its point of interest, recording an
/// error when the two coincide.
pub(crate) fn heading_toward(poi: &mut PointOfInterest, vantage: &Vantage) -> Option<f64> {
    match bearing_to_target(&vantage.coords, &poi.coords) {
        Ok(heading) => Some(heading),
        Err(e) => {
            poi.record_error(PoiError::new(PoiErrorKind::DegenerateHeading, "estimating heading", e.to_string()));
            None
        }
    }
}

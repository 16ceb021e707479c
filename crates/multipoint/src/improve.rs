//! Coordinate correction by nearest-place lookup.

use std::collections::HashMap;
use stopscan_core::model::{PoiError, PoiErrorKind, PointOfInterest};
use stopscan_core::providers::PlaceSearch;
use tracing::{debug, warn};

const SEARCH_CONTEXT: &str = "pulling nearby search results";

/// Which point of interest claimed each matched place in a run.
#[derive(Debug, Clone, Default)]
pub struct PlaceRegistry {
    claims: HashMap<String, String>,
}

impl PlaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `place_id` for `poi_id`, returning the earlier claimant if any.
    pub fn claim(&mut self, place_id: &str, poi_id: &str) -> Option<String> {
        match self.claims.get(place_id) {
            Some(owner) if owner != poi_id => Some(owner.clone()),
            Some(_) => None,
            None => {
                self.claims.insert(place_id.to_string(), poi_id.to_string());
                None
            }
        }
    }
}

/// Result of a correction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// Coordinates now point at the matched place
    Moved,
    /// Matched a place already captured for another stop
    Duplicate { of: String },
    /// The search failed or found nothing; the error is recorded on the stop
    Unchanged,
}

/// Snap `poi` to the nearest place matching its keyword.
///
/// When `registry` is given, a place already claimed by another stop
/// yields [`Correction::Duplicate`] so the caller can skip the capture.
pub fn improve_coords<S>(
    search: &S,
    poi: &mut PointOfInterest,
    radius_m: f64,
    registry: Option<&mut PlaceRegistry>,
) -> Correction
where
    S: PlaceSearch + ?Sized,
{
    let places = match search.nearby_search(poi.coords, &poi.keyword, radius_m) {
        Ok(places) => places,
        Err(e) => {
            poi.record_error(PoiError::new(e.kind(), SEARCH_CONTEXT, e.to_string()));
            return Correction::Unchanged;
        }
    };

    let Some(nearest) = places.first() else {
        let message = format!("no nearby {} found", poi.keyword);
        poi.record_error(PoiError::new(PoiErrorKind::NoResults, SEARCH_CONTEXT, message));
        return Correction::Unchanged;
    };

    debug!(poi = poi.id(), place = %nearest.place_id, from = %poi.coords, to = %nearest.coords, "moving to nearest place");
    poi.apply_place(nearest);

    if let Some(registry) = registry {
        if let Some(owner) = registry.claim(&nearest.place_id, poi.id()) {
            warn!(poi = poi.id(), duplicate_of = %owner, "place already captured, skipping");
            return Correction::Duplicate { of: owner };
        }
    }
    Correction::Moved
}

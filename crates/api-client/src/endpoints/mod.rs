//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one service and implements
//! the matching collaborator trait from `stopscan_core::providers` on
//! [`MapsClient`](crate::MapsClient).
//!
//! | Module | Service | Trait |
//! |--------|---------|-------|
//! | `streetview` | Street View Static API metadata + image | `PanoramaSource`, `ImageSource` |
//! | `places` | Places nearby search | `PlaceSearch` |
//! | `overpass` | Overpass interpreter | `RoadNetwork` |

pub mod overpass;
pub mod places;
pub mod streetview;

pub use overpass::OverpassApi;
pub use places::PlacesApi;
pub use streetview::StreetViewApi;

use serde::Deserialize;
use stopscan_geo::Coordinate;

/// `{"lat": .., "lng": ..}` as used by the Maps APIs
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}

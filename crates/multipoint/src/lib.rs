//! Multi-vantage sampling for street-level imagery.
//!
//! Given a point of interest this crate finds the road it sits on, walks
//! fixed offsets along that road and resolves each offset to a panorama
//! that has not been used yet in the current session.
//!
//! # Example
//!
//! ```rust,no_run
//! use stopscan_core::model::PointOfInterest;
//! use stopscan_core::providers::{PanoramaSource, RoadNetwork};
//! use stopscan_multipoint::{Autospacer, SamplingOptions, UsedPanoramas};
//!
//! fn sample_all<C: PanoramaSource + RoadNetwork>(client: &C, stops: &mut [PointOfInterest]) {
//!     let spacer = Autospacer::new(client, SamplingOptions::default()).expect("valid options");
//!     for stop in stops {
//!         // one session per stop so neighbouring stops can share a panorama
//!         spacer.sample(client, stop, &mut UsedPanoramas::new());
//!     }
//! }
//! ```

pub mod autospacer;
mod error;
pub mod improve;
pub mod plan;
pub mod road;

#[cfg(test)]
mod stubs;

pub use autospacer::{Autospacer, OffsetOutcome, SamplingOptions, SamplingReport};
pub use error::{Result, SamplingError};
pub use improve::{improve_coords, Correction, PlaceRegistry};
pub use plan::plan_vantages;
pub use road::find_road;
pub use stopscan_core::session::UsedPanoramas;

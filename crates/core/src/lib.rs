//! Core types for the stopscan pipeline
//!
//! This crate provides functionality shared by every stage:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Data model**: points of interest, vantages and per-stop errors
//! - **Providers**: collaborator traits for places, roads and imagery
//! - **Stops and run log**: GeoJSON input and JSON output
//! - **Session**: panorama ids already handed out during a run
//!
//! # Example
//!
//! ```rust,no_run
//! use stopscan_core::{config::Config, stops::load_stops};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let stops = load_stops("stops.geojson", Some("stop_id")).expect("unreadable stops");
//! println!("{} stops, fov {}", stops.len(), config.schema.capture.fov);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod run_log;
pub mod session;
pub mod stops;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::model::{PanoramaId, PoiError, PoiErrorKind, PointOfInterest, Stitch, Vantage};
    pub use crate::providers::{
        HighwayFilter, ImageRequest, ImageSource, ImageTarget, PanoramaMetadata, PanoramaSource,
        PlaceRecord, PlaceSearch, ProviderError, ProviderResult, RoadFeature, RoadNetwork,
    };
    pub use crate::run_log::RunLog;
    pub use crate::session::UsedPanoramas;
}

//! HTTP clients for the mapping services behind the stopscan pipeline
//!
//! This crate implements the collaborator traits of
//! `stopscan_core::providers` against real services:
//!
//! - **Street View Static API**: panorama metadata and images
//! - **Places API**: nearby search used for coordinate correction
//! - **Overpass API**: road geometry from OpenStreetMap
//!
//! # Features
//!
//! - **Settings-based configuration**: built from the `[api]` section of `stopscan.toml`
//! - **Rate limiting**: per-endpoint token buckets keep under provider quotas
//! - **Request correlation**: every request carries the run's `X-Session-ID` and its own `X-Request-ID`
//! - **No retries**: failures are returned and recorded against the stop
//!
//! # Example
//!
//! ```rust,no_run
//! use stopscan_api_client::{ClientConfig, MapsClient};
//! use stopscan_geo::Coordinate;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MapsClient::with_config(ClientConfig::new("my-api-key"))?;
//!
//!     let meta = client.streetview().metadata(Coordinate::new(33.749, -84.388))?;
//!     println!("nearest panorama {} taken {:?}", meta.pano_id, meta.date);
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod rate_limit;

pub use client::MapsClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::MapsClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{OverpassApi, PlacesApi, StreetViewApi};
    pub use crate::error::{ApiError, ApiResult};
}

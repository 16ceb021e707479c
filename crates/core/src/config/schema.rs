//! Configuration schema definitions
//!
//! Every field is defaulted so an empty `stopscan.toml` is valid.

use serde::{Deserialize, Serialize};
use stopscan_geo::Crs;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub sampling: SamplingSection,

    #[serde(default)]
    pub capture: CaptureSection,

    #[serde(default)]
    pub assess: AssessSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Mapping API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// File holding the API key, read when no key is set in the environment
    #[serde(default = "default_key_path")]
    pub key_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL for Street View and Places endpoints
    #[serde(default = "default_maps_base_url")]
    pub maps_base_url: String,

    /// Overpass interpreter endpoint
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// Client-side request rate
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            key_path: default_key_path(),
            timeout_secs: default_timeout_secs(),
            maps_base_url: default_maps_base_url(),
            overpass_url: default_overpass_url(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_key_path() -> String {
    "key.txt".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_requests_per_second() -> u32 {
    25
}

/// Road-relative vantage sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingSection {
    /// Vantages behind the main point
    #[serde(default = "default_offsets")]
    pub before: u32,

    /// Vantages ahead of the main point
    #[serde(default = "default_offsets")]
    pub after: u32,

    /// Nominal spacing between vantages, in meters
    #[serde(default = "default_min_interval")]
    pub min_interval_m: f64,

    /// Nudge applied while a panorama is already taken, in meters
    #[serde(default = "default_add_interval")]
    pub add_interval_m: f64,

    /// Road search radius around the point of interest
    #[serde(default = "default_search_radius")]
    pub search_radius_m: f64,

    /// Metric frame used for road geometry
    #[serde(default)]
    pub crs: Crs,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            before: default_offsets(),
            after: default_offsets(),
            min_interval_m: default_min_interval(),
            add_interval_m: default_add_interval(),
            search_radius_m: default_search_radius(),
            crs: Crs::default(),
        }
    }
}

fn default_offsets() -> u32 {
    1
}

fn default_min_interval() -> f64 {
    6.0
}

fn default_add_interval() -> f64 {
    1.0
}

fn default_search_radius() -> f64 {
    200.0
}

/// Image capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSection {
    /// Horizontal field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: u32,

    #[serde(default = "default_image_size")]
    pub width: u32,

    #[serde(default = "default_image_size")]
    pub height: u32,

    /// Extra images stitched to the right of each capture
    #[serde(default)]
    pub stitch_clockwise: u32,

    /// Extra images stitched to the left of each capture
    #[serde(default)]
    pub stitch_counterclockwise: u32,

    /// Nearby-search keyword used for coordinate correction
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Snap each stop to the nearest matching place before sampling
    #[serde(default = "default_true")]
    pub improve_coords: bool,

    /// Skip stops whose matched place was already captured in this run
    #[serde(default = "default_true")]
    pub verify_unique: bool,
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            width: default_image_size(),
            height: default_image_size(),
            stitch_clockwise: 0,
            stitch_counterclockwise: 0,
            keyword: default_keyword(),
            improve_coords: true,
            verify_unique: true,
        }
    }
}

fn default_fov() -> u32 {
    45
}

fn default_image_size() -> u32 {
    640
}

fn default_keyword() -> String {
    "bus stop".to_string()
}

fn default_true() -> bool {
    true
}

/// Amenity scoring thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessSection {
    /// Detections below this confidence are ignored
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Minimum confidence for an amenity to count as present
    #[serde(default = "default_presence_threshold")]
    pub presence_threshold: f64,
}

impl Default for AssessSection {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            presence_threshold: default_presence_threshold(),
        }
    }
}

fn default_score_threshold() -> f64 {
    0.2
}

fn default_presence_threshold() -> f64 {
    0.5
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

//! Points of interest and the vantages captured for them.

use crate::error::ErrorCode;
use crate::providers::PlaceRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use stopscan_geo::Coordinate;
use tracing::warn;

/// Opaque panorama identifier issued by the imagery provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanoramaId(String);

impl PanoramaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanoramaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanoramaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Extra images taken on either side of a capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stitch {
    pub clockwise: u32,
    pub counterclockwise: u32,
}

impl Stitch {
    pub fn new(clockwise: u32, counterclockwise: u32) -> Self {
        Self { clockwise, counterclockwise }
    }

    /// Number of images making up the final picture
    pub fn frames(&self) -> u32 {
        self.clockwise + self.counterclockwise + 1
    }
}

/// A camera position from which a point of interest is photographed.
#[derive(Debug, Clone, PartialEq)]
pub struct Vantage {
    number: u32,
    /// Sampling offset index; `Some(0)` is the main point, `None` a single capture
    pub offset: Option<i32>,
    /// Compass heading toward the point of interest
    pub heading: Option<f64>,
    pub coords: Coordinate,
    pub pano_id: Option<PanoramaId>,
    /// Capture month reported by the provider, e.g. `2019-07`
    pub date: Option<String>,
    pub stitch: Stitch,
}

impl Vantage {
    /// A vantage at `coords`, numbered when added to a point of interest
    pub fn new(coords: Coordinate) -> Self {
        Self {
            number: 0,
            offset: None,
            heading: None,
            coords,
            pano_id: None,
            date: None,
            stitch: Stitch::default(),
        }
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// 1-based position within the owning point of interest
    pub fn number(&self) -> u32 {
        self.number
    }
}

/// Failure categories recorded against a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiErrorKind {
    /// No usable road near the point
    GeometryNotFound,
    /// Every candidate up to the road end was already taken
    RoadEndReached,
    /// Network or API failure
    Transport,
    /// The provider had nothing near the requested location
    NoResults,
    /// Camera and target coincide so no heading exists
    DegenerateHeading,
    /// Image fetch, decode or save failure
    Capture,
}

impl PoiErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::GeometryNotFound => ErrorCode::GeometryNotFound,
            Self::RoadEndReached => ErrorCode::RoadEndReached,
            Self::Transport => ErrorCode::TransportError,
            Self::NoResults => ErrorCode::NoResults,
            Self::DegenerateHeading => ErrorCode::DegenerateHeading,
            Self::Capture => ErrorCode::CaptureError,
        }
    }
}

/// A non-fatal error attached to a point of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiError {
    pub kind: PoiErrorKind,
    /// What was being done, e.g. `incrementing a multipoint`
    pub context: String,
    pub message: String,
}

impl PoiError {
    pub fn new(kind: PoiErrorKind, context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} while {}.", self.message, self.context)
    }
}

impl std::error::Error for PoiError {}

/// A location to be photographed, usually a bus stop.
#[derive(Debug, Clone)]
pub struct PointOfInterest {
    id: String,
    pub coords: Coordinate,
    original_coords: Option<Coordinate>,
    /// Nearby-search keyword used for coordinate correction
    pub keyword: String,
    pub fov: Option<u32>,
    place_id: Option<String>,
    place_name: Option<String>,
    vantages: Vec<Vantage>,
    errors: Vec<PoiError>,
}

impl PointOfInterest {
    pub fn new(id: impl Into<String>, coords: Coordinate) -> Self {
        Self {
            id: id.into(),
            coords,
            original_coords: None,
            keyword: "bus stop".to_string(),
            fov: None,
            place_id: None,
            place_name: None,
            vantages: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Coordinates before the first correction, if any
    pub fn original_coords(&self) -> Option<Coordinate> {
        self.original_coords
    }

    pub fn place_id(&self) -> Option<&str> {
        self.place_id.as_deref()
    }

    pub fn place_name(&self) -> Option<&str> {
        self.place_name.as_deref()
    }

    /// Move to a matched place. The pre-correction position is kept from
    /// the first call only.
    pub fn apply_place(&mut self, place: &PlaceRecord) {
        if self.original_coords.is_none() {
            self.original_coords = Some(self.coords);
        }
        self.coords = place.coords;
        self.place_id = Some(place.place_id.clone());
        self.place_name = Some(place.name.clone());
    }

    pub fn vantages(&self) -> &[Vantage] {
        &self.vantages
    }

    /// Append a vantage, numbering it after the existing ones
    pub fn add_vantage(&mut self, mut vantage: Vantage) -> &mut Vantage {
        let idx = self.vantages.len();
        vantage.number = idx as u32 + 1;
        self.vantages.push(vantage);
        &mut self.vantages[idx]
    }

    pub fn errors(&self) -> &[PoiError] {
        &self.errors
    }

    /// Record a non-fatal error and log it
    pub fn record_error(&mut self, error: PoiError) {
        warn!(poi = %self.id, kind = ?error.kind, "{error}");
        self.errors.push(error);
    }

    pub fn has_error(&self, kind: PoiErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

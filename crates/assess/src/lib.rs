//! Amenity assessment of captured bus stops.
//!
//! Detections come from any [`Detector`]; the bundled [`LabelDirDetector`]
//! reads YOLO label files produced by an external model run. Scores fold
//! every picture of a stop into per-amenity confidences and a completeness
//! share.
//!
//! ```
//! use stopscan_assess::{score_detections, Amenity, Detection, ScoreOptions};
//! use stopscan_image::PixelBox;
//!
//! let bbox = PixelBox { x1: 0, y1: 0, x2: 10, y2: 10 };
//! let detections = [Detection { amenity: Amenity::Shelter, confidence: 0.8, bbox }];
//! let score = score_detections(&detections, &ScoreOptions::default());
//! assert_eq!(score.completeness, 0.25);
//! ```

pub mod amenity;
pub mod detection;
mod error;
pub mod score;

pub use amenity::Amenity;
pub use detection::{decode_rows, parse_labels, Detection, Detector, LabelDirDetector};
pub use error::{AssessError, Result};
pub use score::{assess_log, assess_stop, score_detections, AmenityScore, ScoreOptions, StopAssessment};

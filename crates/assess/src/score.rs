//! Amenity completeness scoring per stop.
//!
//! For each amenity the stop's confidence is the best detection across all
//! of its pictures. This is a heuristic summary of detector output, not a
//! validated classifier.

use crate::amenity::Amenity;
use crate::detection::{Detection, Detector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use stopscan_core::config::AssessSection;
use stopscan_core::run_log::{LogEntry, RunLog};
use stopscan_image::image_path;
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Thresholds applied to detector confidences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOptions {
    /// Detections below this are ignored entirely
    pub score_threshold: f64,
    /// Confidence at which an amenity counts as present
    pub presence_threshold: f64,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self::from(&AssessSection::default())
    }
}

impl From<&AssessSection> for ScoreOptions {
    fn from(section: &AssessSection) -> Self {
        Self {
            score_threshold: section.score_threshold,
            presence_threshold: section.presence_threshold,
        }
    }
}

/// Amenity summary for one stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmenityScore {
    pub confidence: BTreeMap<Amenity, f64>,
    pub present: Vec<Amenity>,
    /// Share of the four amenities present, in `[0, 1]`
    pub completeness: f64,
}

/// Fold detections from any number of pictures into an [`AmenityScore`].
pub fn score_detections<'a, I>(detections: I, options: &ScoreOptions) -> AmenityScore
where
    I: IntoIterator<Item = &'a Detection>,
{
    let mut confidence: BTreeMap<Amenity, f64> = BTreeMap::new();
    for detection in detections {
        if detection.confidence < options.score_threshold {
            continue;
        }
        let best = confidence.entry(detection.amenity).or_insert(0.0);
        *best = best.max(detection.confidence);
    }

    let present: Vec<Amenity> = Amenity::ALL
        .into_iter()
        .filter(|a| confidence.get(a).is_some_and(|&c| c >= options.presence_threshold))
        .collect();
    let completeness = present.len() as f64 / Amenity::ALL.len() as f64;

    AmenityScore { confidence, present, completeness }
}

/// Assessment of one stop from its captured pictures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopAssessment {
    pub stop_id: String,
    /// Pictures that were found and run through the detector
    pub images: usize,
    pub missing_images: usize,
    #[serde(flatten)]
    pub score: AmenityScore,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Run `detector` over every picture the log lists for `stop_id`.
pub fn assess_stop<D>(
    detector: &D,
    stop_id: &str,
    entry: &LogEntry,
    folder: &Path,
    options: &ScoreOptions,
) -> StopAssessment
where
    D: Detector + ?Sized,
{
    let mut detections = Vec::new();
    let mut errors = Vec::new();
    let mut images = 0;
    let mut missing_images = 0;

    for picture in &entry.pictures {
        let path = image_path(folder, stop_id, picture.pic_number);
        if !path.exists() {
            missing_images += 1;
            continue;
        }
        match detector.detect(&path) {
            Ok(found) => {
                images += 1;
                detections.extend(found);
            }
            Err(e) => {
                warn!(stop = stop_id, image = %path.display(), error = %e, "detection failed");
                errors.push(format!("{}: {e}", path.display()));
            }
        }
    }

    StopAssessment {
        stop_id: stop_id.to_string(),
        images,
        missing_images,
        score: score_detections(&detections, options),
        errors,
    }
}

/// Assess every stop in a run log, in id order.
pub fn assess_log<D>(detector: &D, log: &RunLog, folder: &Path, options: &ScoreOptions) -> Vec<StopAssessment>
where
    D: Detector + Sync + ?Sized,
{
    let entries: Vec<(&str, &LogEntry)> = log.entries().collect();

    #[cfg(feature = "parallel")]
    let iter = entries.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = entries.iter();

    let results: Vec<StopAssessment> = iter
        .map(|(id, entry)| assess_stop(detector, id, entry, folder, options))
        .collect();

    info!(stops = results.len(), "assessment finished");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssessError, Result};
    use std::collections::HashMap;
    use stopscan_core::model::{PointOfInterest, Vantage};
    use stopscan_geo::Coordinate;
    use stopscan_image::PixelBox;
    use tempfile::TempDir;

    fn det(amenity: Amenity, confidence: f64) -> Detection {
        Detection { amenity, confidence, bbox: PixelBox { x1: 0, y1: 0, x2: 1, y2: 1 } }
    }

    struct MapDetector(HashMap<String, Vec<Detection>>);

    impl Detector for MapDetector {
        fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
            let name = image.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("bad") {
                return Err(AssessError::label(1, "corrupt"));
            }
            Ok(self.0.get(&name).cloned().unwrap_or_default())
        }
    }

    fn log_with(stops: &[(&str, usize)]) -> RunLog {
        let mut log = RunLog::new();
        for (id, pictures) in stops {
            let mut poi = PointOfInterest::new(*id, Coordinate::new(33.8, -84.4));
            for _ in 0..*pictures {
                poi.add_vantage(Vantage::new(Coordinate::new(33.8, -84.4001)));
            }
            log.upsert(&poi);
        }
        log
    }

    #[test]
    fn test_max_confidence_and_thresholds() {
        let detections = [
            det(Amenity::Shelter, 0.4),
            det(Amenity::Shelter, 0.9),
            det(Amenity::Signage, 0.3),
            det(Amenity::Seating, 0.1),
        ];
        let score = score_detections(&detections, &ScoreOptions::default());

        assert_eq!(score.confidence.get(&Amenity::Shelter), Some(&0.9));
        assert_eq!(score.confidence.get(&Amenity::Signage), Some(&0.3));
        assert!(!score.confidence.contains_key(&Amenity::Seating));
        assert_eq!(score.present, vec![Amenity::Shelter]);
        assert_eq!(score.completeness, 0.25);
    }

    #[test]
    fn test_full_stop() {
        let detections: Vec<Detection> = Amenity::ALL.into_iter().map(|a| det(a, 0.8)).collect();
        let score = score_detections(&detections, &ScoreOptions::default());
        assert_eq!(score.completeness, 1.0);
    }

    #[test]
    fn test_assess_log_over_pictures() {
        let dir = TempDir::new().unwrap();
        let log = log_with(&[("a", 2), ("b", 1)]);
        // b_1.jpg is never written
        for name in ["a_1.jpg", "a_2.jpg"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let detector = MapDetector(HashMap::from([
            ("a_1.jpg".to_string(), vec![det(Amenity::Shelter, 0.7)]),
            ("a_2.jpg".to_string(), vec![det(Amenity::Seating, 0.6), det(Amenity::Shelter, 0.95)]),
        ]));

        let results = assess_log(&detector, &log, dir.path(), &ScoreOptions::default());

        assert_eq!(results.len(), 2);
        let a = &results[0];
        assert_eq!(a.stop_id, "a");
        assert_eq!(a.images, 2);
        assert_eq!(a.score.present, vec![Amenity::Seating, Amenity::Shelter]);
        assert_eq!(a.score.confidence.get(&Amenity::Shelter), Some(&0.95));

        let b = &results[1];
        assert_eq!((b.images, b.missing_images), (0, 1));
        assert_eq!(b.score.completeness, 0.0);
    }

    #[test]
    fn test_detector_errors_are_collected() {
        let dir = TempDir::new().unwrap();
        let log = log_with(&[("bad", 1)]);
        std::fs::write(dir.path().join("bad_1.jpg"), b"").unwrap();

        let results = assess_log(&MapDetector(HashMap::new()), &log, dir.path(), &ScoreOptions::default());

        assert_eq!(results[0].images, 0);
        assert_eq!(results[0].errors.len(), 1);
        assert!(results[0].errors[0].contains("corrupt"));
    }

    #[test]
    fn test_assessment_json_shape() {
        let assessment = StopAssessment {
            stop_id: "907".into(),
            images: 1,
            missing_images: 0,
            score: score_detections(&[det(Amenity::TrashCan, 0.6)], &ScoreOptions::default()),
            errors: Vec::new(),
        };
        let json = serde_json::to_value(&assessment).unwrap();

        assert_eq!(json["confidence"]["Trash Can"], 0.6);
        assert_eq!(json["present"][0], "Trash Can");
        assert!(json.get("errors").is_none());
    }
}

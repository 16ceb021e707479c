//! Amenity detections, from YOLO label files or raw detector rows.
//!
//! Label files hold one detection per line as `class cx cy w h [conf]` with
//! coordinates normalized to the image size. Lines without a confidence are
//! ground-truth annotations and count as certain.

use crate::amenity::Amenity;
use crate::error::{AssessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stopscan_image::{Letterbox, PixelBox};
use tracing::debug;

/// One detected amenity in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub amenity: Amenity,
    pub confidence: f64,
    pub bbox: PixelBox,
}

/// Something that can find amenities in a saved image.
pub trait Detector {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>>;
}

/// Parse YOLO label text for an image of `width` by `height` pixels.
pub fn parse_labels(text: &str, width: u32, height: u32) -> Result<Vec<Detection>> {
    let (w, h) = (f64::from(width), f64::from(height));

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_no = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if !(5..=6).contains(&fields.len()) {
                return Err(AssessError::label(line_no, format!("expected 5 or 6 fields, got {}", fields.len())));
            }

            let class: usize = fields[0]
                .parse()
                .map_err(|_| AssessError::label(line_no, format!("bad class {:?}", fields[0])))?;
            let amenity = Amenity::from_class(class)
                .ok_or_else(|| AssessError::label(line_no, format!("unknown class {class}")))?;

            let mut values = [0.0f64; 5];
            for (slot, field) in values.iter_mut().zip(&fields[1..]) {
                *slot = field
                    .parse()
                    .map_err(|_| AssessError::label(line_no, format!("bad number {field:?}")))?;
            }
            let [cx, cy, bw, bh, _] = values;
            let confidence = if fields.len() == 6 { values[4] } else { 1.0 };

            Ok(Detection {
                amenity,
                confidence,
                bbox: PixelBox::from_center(cx * w, cy * h, bw * w, bh * h),
            })
        })
        .collect()
}

/// Decode post-NMS detector rows `[cx, cy, w, h, score_0, .., score_n]`
/// given in letterboxed pixels.
///
/// The class is the highest-scoring column; rows below `min_confidence`
/// or with an unknown class are dropped.
pub fn decode_rows(rows: &[Vec<f32>], letterbox: &Letterbox, min_confidence: f64) -> Vec<Detection> {
    rows.iter()
        .filter_map(|row| {
            let (geometry, scores) = row.split_at_checked(4)?;
            let (class, score) = scores
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))?;
            let amenity = Amenity::from_class(class)?;
            let confidence = f64::from(*score);
            if confidence < min_confidence {
                return None;
            }

            let [cx, cy, w, h] = [geometry[0], geometry[1], geometry[2], geometry[3]].map(f64::from);
            Some(Detection { amenity, confidence, bbox: letterbox.to_source(cx, cy, w, h) })
        })
        .collect()
}

/// Reads detections from a directory of YOLO label files named after the
/// images, as written by an external detector run.
#[derive(Debug, Clone)]
pub struct LabelDirDetector {
    labels: PathBuf,
}

impl LabelDirDetector {
    pub fn new(labels: impl Into<PathBuf>) -> Self {
        Self { labels: labels.into() }
    }

    pub fn label_path(&self, image: &Path) -> PathBuf {
        let stem = image.file_stem().unwrap_or_default().to_string_lossy();
        self.labels.join(format!("{stem}.txt"))
    }
}

impl Detector for LabelDirDetector {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        let label_path = self.label_path(image);
        // detectors write no file for an image without detections
        if !label_path.exists() {
            debug!(image = %image.display(), "no label file");
            return Ok(Vec::new());
        }

        let (width, height) = image::image_dimensions(image)?;
        let text = std::fs::read_to_string(&label_path)?;
        parse_labels(&text, width, height)
    }
}

//! Letterboxing for square detector inputs and the inverse box mapping.

use image::{imageops, DynamicImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Square input side expected by the amenity detector.
pub const DETECTOR_INPUT: u32 = 640;

/// Grey used for the padding bands.
pub const PAD_VALUE: u8 = 114;

/// Axis-aligned box in pixel coordinates of the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelBox {
    /// Box from a center point and size, truncating toward zero.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x1: (cx - width / 2.0) as i32,
            y1: (cy - height / 2.0) as i32,
            x2: (cx + width / 2.0) as i32,
            y2: (cy + height / 2.0) as i32,
        }
    }
}

/// Aspect-preserving resize into a padded square, remembered so detector
/// boxes can be mapped back onto the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub target: u32,
    pub resized_width: u32,
    pub resized_height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Letterbox {
    /// Geometry for fitting a `width` by `height` image into `target` squared.
    pub fn new(width: u32, height: u32, target: u32) -> Self {
        let (w, h, t) = (f64::from(width.max(1)), f64::from(height.max(1)), f64::from(target));
        let (resized_width, resized_height) = if width > height {
            (target, ((h * t / w) as u32).max(1))
        } else {
            (((w * t / h) as u32).max(1), target)
        };

        Self {
            target,
            resized_width,
            resized_height,
            pad_x: (target - resized_width) / 2,
            pad_y: (target - resized_height) / 2,
            scale_x: w / f64::from(resized_width),
            scale_y: h / f64::from(resized_height),
        }
    }

    /// Letterbox geometry for the detector's input size.
    pub fn for_detector(width: u32, height: u32) -> Self {
        Self::new(width, height, DETECTOR_INPUT)
    }

    /// Resize `image` and centre it on a grey square canvas.
    pub fn apply(&self, image: &DynamicImage) -> RgbImage {
        let resized = imageops::resize(
            &image.to_rgb8(),
            self.resized_width,
            self.resized_height,
            imageops::FilterType::Triangle,
        );
        let mut canvas = RgbImage::from_pixel(self.target, self.target, Rgb([PAD_VALUE; 3]));
        imageops::overlay(&mut canvas, &resized, i64::from(self.pad_x), i64::from(self.pad_y));
        canvas
    }

    /// Map a detector box (center and size in letterboxed pixels) back to
    /// the source image: corners first, then padding removed, then rescaled.
    pub fn to_source(&self, cx: f64, cy: f64, width: f64, height: f64) -> PixelBox {
        let (pad_x, pad_y) = (f64::from(self.pad_x), f64::from(self.pad_y));
        let x1 = cx - width / 2.0;
        let y1 = cy - height / 2.0;
        let x2 = cx + width / 2.0;
        let y2 = cy + height / 2.0;

        PixelBox {
            x1: ((x1 - pad_x) * self.scale_x) as i32,
            y1: ((y1 - pad_y) * self.scale_y) as i32,
            x2: ((x2 - pad_x) * self.scale_x) as i32,
            y2: ((y2 - pad_y) * self.scale_y) as i32,
        }
    }
}

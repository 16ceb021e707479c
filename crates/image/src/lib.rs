//! Street-level image capture for stopscan.
//!
//! This crate provides:
//! - Format sniffing of provider responses before decoding
//! - Multi-frame stitching along a heading sweep
//! - Capture of every vantage of a point of interest to JPEG files
//! - Letterboxing for the amenity detector and the inverse box mapping

mod capture;
mod detect;
mod error;
pub mod letterbox;
mod stitch;

pub use capture::{image_path, CaptureOptions, CaptureReport, Capturer};
pub use detect::{decode_image, detect_format, ImageFormat};
pub use error::{CaptureError, Result};
pub use letterbox::{Letterbox, PixelBox, DETECTOR_INPUT};
pub use stitch::{stitch_headings, stitch_images};

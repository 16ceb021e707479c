//! Panoramic stitching of adjacent frames.

use image::{imageops, DynamicImage, Rgb, RgbImage};
use stopscan_core::model::Stitch;
use stopscan_geo::normalize_heading;

/// Headings of every frame in a stitched capture, left to right.
///
/// The first frame sits `counterclockwise` fields of view before `heading`
/// and each following frame one field of view further clockwise.
///
/// ```
/// use stopscan_core::model::Stitch;
/// use stopscan_image::stitch_headings;
///
/// assert_eq!(stitch_headings(10.0, Stitch::new(1, 1), 45), vec![325.0, 10.0, 55.0]);
/// ```
pub fn stitch_headings(heading: f64, stitch: Stitch, fov: u32) -> Vec<f64> {
    let fov = f64::from(fov);
    let start = heading - f64::from(stitch.counterclockwise) * fov;
    (0..stitch.frames())
        .map(|i| normalize_heading(start + f64::from(i) * fov))
        .collect()
}

/// Concatenate frames horizontally onto a `width * n` by `height` canvas.
///
/// Each frame is pasted at the running x offset of the frames before it;
/// anything larger than the canvas is cropped and any gap stays black.
pub fn stitch_images(frames: &[DynamicImage], width: u32, height: u32) -> RgbImage {
    let count = u32::try_from(frames.len()).unwrap_or(u32::MAX);
    let mut canvas = RgbImage::from_pixel(width.saturating_mul(count), height, Rgb([0, 0, 0]));

    let mut x_offset: i64 = 0;
    for frame in frames {
        let rgb = frame.to_rgb8();
        imageops::overlay(&mut canvas, &rgb, x_offset, 0);
        x_offset += i64::from(rgb.width());
    }
    canvas
}

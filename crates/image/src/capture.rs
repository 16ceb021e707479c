//! Fetching, stitching and saving the pictures of a point of interest.

use crate::detect::decode_image;
use crate::error::{CaptureError, Result};
use crate::stitch::{stitch_headings, stitch_images};
use std::path::{Path, PathBuf};
use stopscan_core::config::CaptureSection;
use stopscan_core::model::{PoiError, PoiErrorKind, PointOfInterest, Stitch, Vantage};
use stopscan_core::providers::{ImageRequest, ImageSource, ImageTarget, PanoramaSource};
use stopscan_core::session::UsedPanoramas;
use stopscan_geo::bearing_to_target;
use tracing::{debug, info, warn};

const IMAGE_CONTEXT: &str = "pulling image";
const METADATA_CONTEXT: &str = "pulling metadata";

/// Parameters shared by every picture of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Horizontal field of view in degrees
    pub fov: u32,
    pub width: u32,
    pub height: u32,
    /// Stitch applied to the single vantage created when a point has none
    pub stitch: Stitch,
    pub folder: PathBuf,
}

impl CaptureOptions {
    pub fn from_section(section: &CaptureSection, folder: impl Into<PathBuf>) -> Self {
        Self {
            fov: section.fov,
            width: section.width,
            height: section.height,
            stitch: Stitch::new(section.stitch_clockwise, section.stitch_counterclockwise),
            folder: folder.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(10..=120).contains(&self.fov) {
            return Err(CaptureError::InvalidOptions(format!(
                "FOV must be between 10 and 120 degrees, got {}",
                self.fov
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::InvalidOptions(format!(
                "image size must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn image_path(&self, poi_id: &str, number: u32) -> PathBuf {
        image_path(&self.folder, poi_id, number)
    }
}

/// Where the picture for vantage `number` of `poi_id` is written.
pub fn image_path(folder: &Path, poi_id: &str, number: u32) -> PathBuf {
    folder.join(format!("{poi_id}_{number}.jpg"))
}

/// Outcome of capturing one point of interest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureReport {
    pub saved: Vec<PathBuf>,
    /// Vantages without a heading
    pub skipped: usize,
    pub failed: usize,
}

/// Pulls street-level pictures for each vantage of a point of interest.
pub struct Capturer<'a, S: ?Sized> {
    source: &'a S,
    options: CaptureOptions,
}

impl<'a, S> Capturer<'a, S>
where
    S: ImageSource + PanoramaSource + ?Sized,
{
    pub fn new(source: &'a S, options: CaptureOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { source, options })
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    /// Capture every vantage of `poi`.
    ///
    /// A point without vantages gets one at its own coordinate, aimed from
    /// the nearest panorama unless `used` already holds that panorama.
    /// Failures are recorded on `poi` and never abort the remaining vantages.
    pub fn capture(&self, poi: &mut PointOfInterest, used: &mut UsedPanoramas) -> CaptureReport {
        poi.fov = Some(self.options.fov);
        if poi.vantages().is_empty() {
            self.add_single_vantage(poi, used);
        }

        let mut report = CaptureReport::default();
        for vantage in poi.vantages().to_vec() {
            let Some(heading) = vantage.heading else {
                debug!(poi = poi.id(), number = vantage.number(), "no heading, skipping picture");
                report.skipped += 1;
                continue;
            };

            match self.capture_vantage(poi.id(), &vantage, heading) {
                Ok(path) => report.saved.push(path),
                Err(e) => {
                    poi.record_error(PoiError::new(e.kind(), IMAGE_CONTEXT, e.to_string()));
                    report.failed += 1;
                }
            }
        }

        info!(poi = poi.id(), saved = report.saved.len(), failed = report.failed, "capture finished");
        report
    }

    fn add_single_vantage(&self, poi: &mut PointOfInterest, used: &mut UsedPanoramas) {
        let mut vantage = Vantage::new(poi.coords);
        vantage.stitch = self.options.stitch;

        match self.source.panorama_metadata(poi.coords) {
            Ok(metadata) if !used.reserve(&metadata.pano_id) => {
                warn!(poi = poi.id(), pano = %metadata.pano_id, "nearest panorama already used");
                poi.record_error(PoiError::new(
                    PoiErrorKind::NoResults,
                    METADATA_CONTEXT,
                    format!("Panorama {} already used in this session", metadata.pano_id),
                ));
            }
            Ok(metadata) => {
                vantage.coords = metadata.coords;
                vantage.pano_id = Some(metadata.pano_id);
                vantage.date = metadata.date;
                match bearing_to_target(&vantage.coords, &poi.coords) {
                    Ok(heading) => vantage.heading = Some(heading),
                    Err(e) => poi.record_error(PoiError::new(
                        PoiErrorKind::DegenerateHeading,
                        "estimating heading",
                        e.to_string(),
                    )),
                }
            }
            Err(e) => poi.record_error(PoiError::new(e.kind(), METADATA_CONTEXT, e.to_string())),
        }

        poi.add_vantage(vantage);
    }

    fn capture_vantage(&self, poi_id: &str, vantage: &Vantage, heading: f64) -> Result<PathBuf> {
        let target = match &vantage.pano_id {
            Some(id) => ImageTarget::Panorama(id.clone()),
            None => ImageTarget::Location(vantage.coords),
        };

        let frames = stitch_headings(heading, vantage.stitch, self.options.fov)
            .into_iter()
            .map(|heading| {
                let request = ImageRequest {
                    target: target.clone(),
                    heading,
                    fov: self.options.fov,
                    width: self.options.width,
                    height: self.options.height,
                };
                debug!(poi = poi_id, number = vantage.number(), heading, "pulling image");
                let bytes = self.source.fetch_image(&request)?;
                decode_image(&bytes)
            })
            .collect::<Result<Vec<_>>>()?;

        let picture = match frames.as_slice() {
            [single] => single.to_rgb8(),
            many => stitch_images(many, self.options.width, self.options.height),
        };

        let path = self.options.image_path(poi_id, vantage.number());
        save_jpeg(&picture, &path)?;
        Ok(path)
    }
}

fn save_jpeg(picture: &image::RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    picture.save_with_format(path, image::ImageFormat::Jpeg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::cell::RefCell;
    use std::io::Cursor;
    use stopscan_core::model::PanoramaId;
    use stopscan_core::providers::{PanoramaMetadata, ProviderError, ProviderResult};
    use stopscan_geo::Coordinate;
    use tempfile::TempDir;

    const STOP: Coordinate = Coordinate { latitude: 33.838752, longitude: -84.368854 };
    const CAMERA: Coordinate = Coordinate { latitude: 33.838600, longitude: -84.368854 };

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 150])))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(90))
            .unwrap();
        bytes
    }

    struct StubImagery {
        metadata: ProviderResult<PanoramaMetadata>,
        image: ProviderResult<Vec<u8>>,
        requests: RefCell<Vec<ImageRequest>>,
    }

    impl StubImagery {
        fn new() -> Self {
            Self {
                metadata: Ok(PanoramaMetadata {
                    pano_id: PanoramaId::new("pano-1"),
                    coords: CAMERA,
                    date: Some("2019-07".into()),
                }),
                image: Ok(jpeg(64, 48)),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PanoramaSource for StubImagery {
        fn panorama_metadata(&self, _at: Coordinate) -> ProviderResult<PanoramaMetadata> {
            self.metadata.clone()
        }
    }

    impl ImageSource for StubImagery {
        fn fetch_image(&self, request: &ImageRequest) -> ProviderResult<Vec<u8>> {
            self.requests.borrow_mut().push(request.clone());
            self.image.clone()
        }
    }

    fn options(dir: &TempDir, stitch: Stitch) -> CaptureOptions {
        CaptureOptions { fov: 45, width: 64, height: 48, stitch, folder: dir.path().join("pics") }
    }

    #[test]
    fn test_rejects_fov_out_of_range() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery::new();
        for fov in [5, 121] {
            let opts = CaptureOptions { fov, ..options(&dir, Stitch::default()) };
            assert!(matches!(Capturer::new(&source, opts), Err(CaptureError::InvalidOptions(_))));
        }
    }

    #[test]
    fn test_single_capture_aims_from_panorama() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery::new();
        let capturer = Capturer::new(&source, options(&dir, Stitch::default())).unwrap();
        let mut poi = PointOfInterest::new("907", STOP);

        let report = capturer.capture(&mut poi, &mut UsedPanoramas::new());

        assert_eq!(report.saved, vec![dir.path().join("pics/907_1.jpg")]);
        assert!(report.saved[0].exists());
        assert_eq!(poi.fov, Some(45));

        let vantage = &poi.vantages()[0];
        assert_eq!(vantage.coords, CAMERA);
        assert_eq!(vantage.date.as_deref(), Some("2019-07"));
        // camera due south of the stop looks north
        let heading = vantage.heading.unwrap();
        assert!(heading < 0.01 || heading > 359.99, "heading {heading}");

        let requests = source.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target, ImageTarget::Panorama(PanoramaId::new("pano-1")));
    }

    #[test]
    fn test_single_capture_respects_session() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery::new();
        let capturer = Capturer::new(&source, options(&dir, Stitch::default())).unwrap();
        let mut used = UsedPanoramas::new();

        let mut first = PointOfInterest::new("a", STOP);
        assert_eq!(capturer.capture(&mut first, &mut used).saved.len(), 1);
        assert!(used.contains(&PanoramaId::new("pano-1")));

        // neighbouring stop resolves to the same panorama
        let mut second = PointOfInterest::new("b", STOP);
        let report = capturer.capture(&mut second, &mut used);

        assert!(report.saved.is_empty());
        assert_eq!(report.skipped, 1);
        assert!(second.has_error(PoiErrorKind::NoResults));
        assert_eq!(second.errors()[0].context, METADATA_CONTEXT);
        assert!(second.vantages()[0].pano_id.is_none());
        assert_eq!(source.requests.borrow().len(), 1);
        assert!(!dir.path().join("pics/b_1.jpg").exists());
    }

    #[test]
    fn test_stitched_capture_is_wide() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery::new();
        let capturer = Capturer::new(&source, options(&dir, Stitch::new(1, 1))).unwrap();
        let mut poi = PointOfInterest::new("s", STOP);

        let report = capturer.capture(&mut poi, &mut UsedPanoramas::new());

        let saved = image::open(&report.saved[0]).unwrap();
        assert_eq!((saved.width(), saved.height()), (192, 48));
        let headings: Vec<f64> = source.requests.borrow().iter().map(|r| r.heading).collect();
        assert_eq!(headings.len(), 3);
        assert!((headings[0] - 315.0).abs() < 0.01);
        assert!((headings[2] - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_existing_vantages_use_their_numbers() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery::new();
        let capturer = Capturer::new(&source, options(&dir, Stitch::default())).unwrap();
        let mut poi = PointOfInterest::new("m", STOP);
        poi.add_vantage(Vantage::new(CAMERA).with_offset(0).with_heading(0.0));
        poi.add_vantage(Vantage::new(CAMERA).with_offset(-1));
        poi.add_vantage(Vantage::new(CAMERA).with_offset(1).with_heading(10.0));

        let report = capturer.capture(&mut poi, &mut UsedPanoramas::new());

        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.saved,
            vec![dir.path().join("pics/m_1.jpg"), dir.path().join("pics/m_3.jpg")]
        );
        // no pano id on these vantages, so the camera is placed by location
        assert_eq!(source.requests.borrow()[0].target, ImageTarget::Location(CAMERA));
    }

    #[test]
    fn test_non_image_body_recorded() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery { image: Ok(b"<html>quota</html>".to_vec()), ..StubImagery::new() };
        let capturer = Capturer::new(&source, options(&dir, Stitch::default())).unwrap();
        let mut poi = PointOfInterest::new("x", STOP);

        let report = capturer.capture(&mut poi, &mut UsedPanoramas::new());

        assert_eq!(report.failed, 1);
        assert!(report.saved.is_empty());
        assert!(poi.has_error(PoiErrorKind::Capture));
        assert_eq!(poi.errors()[0].context, IMAGE_CONTEXT);
    }

    #[test]
    fn test_missing_panorama_skips_capture() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery {
            metadata: Err(ProviderError::NoResults("no panorama near stop".into())),
            ..StubImagery::new()
        };
        let capturer = Capturer::new(&source, options(&dir, Stitch::default())).unwrap();
        let mut poi = PointOfInterest::new("n", STOP);

        let report = capturer.capture(&mut poi, &mut UsedPanoramas::new());

        assert_eq!(report.skipped, 1);
        assert!(poi.has_error(PoiErrorKind::NoResults));
        assert!(source.requests.borrow().is_empty());
    }

    #[test]
    fn test_transport_error_keeps_kind() {
        let dir = TempDir::new().unwrap();
        let source = StubImagery {
            image: Err(ProviderError::Api { status: 500, message: "empty response".into() }),
            ..StubImagery::new()
        };
        let capturer = Capturer::new(&source, options(&dir, Stitch::default())).unwrap();
        let mut poi = PointOfInterest::new("t", STOP);

        capturer.capture(&mut poi, &mut UsedPanoramas::new());

        assert!(poi.has_error(PoiErrorKind::Transport));
        assert_eq!(poi.errors()[0].message, "(500): empty response");
    }
}

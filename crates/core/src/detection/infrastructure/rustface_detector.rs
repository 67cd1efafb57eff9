//! Face detector backed by the `rustface` crate (SeetaFace funnel cascade).
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::GrayFrame;
use crate::shared::region::Region;

/// Score each unit of `min_neighbors` adds to the acceptance threshold.
///
/// The engine's NMS sums the scores of every raw window it merges into a
/// face, so the final score grows with the number of overlapping hits.
pub const NEIGHBOR_SCORE_UNIT: f64 = 0.5;

/// Smallest face the engine can scan for.
const MIN_FACE_SIZE: u32 = 20;

const SLIDE_WINDOW_STEP: u32 = 4;

#[derive(Error, Debug)]
pub enum FaceModelError {
    #[error("failed to read face model {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid face model {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("invalid face model data: {0}")]
    Data(String),
}

pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model file (`seeta_fd_frontal_v1.0.bin`).
    pub fn from_file(path: &Path) -> Result<Self, FaceModelError> {
        let bytes = std::fs::read(path).map_err(|source| FaceModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let detector = Self::from_bytes(&bytes).map_err(|e| match e {
            FaceModelError::Data(reason) => FaceModelError::Parse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        log::info!("Loaded face model from {}", path.display());
        Ok(detector)
    }

    /// Parse a model already held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FaceModelError> {
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|e| FaceModelError::Data(e.to_string()))?;
        Ok(Self { model })
    }
}

/// Pyramid downscale step for the engine: the inverse of `scale_factor`.
pub fn pyramid_scale(params: &DetectionParams) -> f32 {
    (1.0 / params.scale_factor()) as f32
}

pub fn score_threshold(params: &DetectionParams) -> f64 {
    f64::from(params.min_neighbors()) * NEIGHBOR_SCORE_UNIT
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &GrayFrame,
        params: &DetectionParams,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if gray.is_empty() {
            return Ok(Vec::new());
        }

        // A fresh engine per call keeps detection free of carried-over state
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);
        detector.set_pyramid_scale_factor(pyramid_scale(params));
        detector.set_score_thresh(score_threshold(params));
        log::debug!(
            "rustface: pyramid_scale={:.3} score_thresh={:.2}",
            pyramid_scale(params),
            score_threshold(params)
        );

        let image = rustface::ImageData::new(gray.data(), gray.width(), gray.height());
        let faces = detector.detect(&image);

        let raw = faces.iter().map(|face| {
            let bbox = face.bbox();
            (
                i64::from(bbox.x()),
                i64::from(bbox.y()),
                i64::from(bbox.width()),
                i64::from(bbox.height()),
            )
        });
        Ok(clip_to_frame(raw, gray.width(), gray.height()))
    }
}

/// Clip raw engine boxes to the frame, dropping boxes that end up empty.
fn clip_to_frame(
    raw: impl Iterator<Item = (i64, i64, i64, i64)>,
    width: u32,
    height: u32,
) -> Vec<Region> {
    raw.filter_map(|(x, y, w, h)| Region::clipped(x, y, w, h, width, height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    use crate::shared::constants::{MAX_NEIGHBORS, MIN_NEIGHBORS};
    use crate::shared::frame::Frame;

    #[rstest]
    #[case::default(1.1, 1.0 / 1.1)]
    #[case::min(1.05, 1.0 / 1.05)]
    #[case::max(2.0, 0.5)]
    fn test_pyramid_scale_is_inverse(#[case] scale_factor: f64, #[case] expected: f64) {
        let params = DetectionParams::new(scale_factor, 5);
        assert_relative_eq!(pyramid_scale(&params), expected as f32);
    }

    #[test]
    fn test_pyramid_scale_stays_in_engine_range() {
        for step in 0..=19 {
            let params = DetectionParams::new(1.05 + step as f64 * 0.05, 5);
            let scale = pyramid_scale(&params);
            assert!((0.01..=0.99).contains(&scale), "scale {scale} out of range");
        }
    }

    #[test]
    fn test_score_threshold_grows_with_min_neighbors() {
        let low = score_threshold(&DetectionParams::new(1.1, 1));
        let high = score_threshold(&DetectionParams::new(1.1, 10));
        assert_relative_eq!(low, 0.5);
        assert_relative_eq!(high, 5.0);
        assert!(low > 0.0);
    }

    #[test]
    fn test_clip_to_frame_keeps_regions_in_bounds() {
        let raw = vec![
            (-15, -5, 60, 60),
            (70, 70, 60, 60),
            (10, 10, 50, 50),
            (200, 200, 20, 20),
        ];
        let regions = clip_to_frame(raw.into_iter(), 100, 100);
        assert_eq!(
            regions,
            vec![
                Region::new(0, 0, 45, 55),
                Region::new(70, 70, 30, 30),
                Region::new(10, 10, 50, 50),
            ]
        );
        assert!(regions.iter().all(|r| r.is_within(100, 100)));
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = RustfaceDetector::from_file(Path::new("/nonexistent/model.bin"));
        assert!(matches!(result, Err(FaceModelError::Read { .. })));
    }

    #[test]
    fn test_from_file_garbage_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"xx").unwrap();
        assert!(matches!(
            RustfaceDetector::from_file(&path),
            Err(FaceModelError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_bytes_garbage_model() {
        assert!(matches!(
            RustfaceDetector::from_bytes(b"xx"),
            Err(FaceModelError::Data(_))
        ));
    }

    const MODEL: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/seeta_fd_frontal_v1.0.bin"
    ));

    /// 700x300 crop of the 1927 Solvay conference photo, about a dozen
    /// frontal faces.
    const GROUP_PHOTO: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/group_photo.png"
    ));

    fn bundled_detector() -> RustfaceDetector {
        RustfaceDetector::from_bytes(MODEL).unwrap()
    }

    fn group_photo_gray() -> GrayFrame {
        let rgb = image::load_from_memory(GROUP_PHOTO).unwrap().into_rgb8();
        let (w, h) = rgb.dimensions();
        Frame::new(rgb.into_raw(), w, h).to_grayscale()
    }

    fn sorted(mut regions: Vec<Region>) -> Vec<Region> {
        regions.sort();
        regions
    }

    #[test]
    fn test_bundled_model_finds_faces_in_group_photo() {
        let gray = group_photo_gray();
        let regions = bundled_detector()
            .detect(&gray, &DetectionParams::default())
            .unwrap();
        assert!(!regions.is_empty(), "expected faces in the group photo");
        for r in &regions {
            // Faces in the crop are roughly 40-70 px across
            assert!(r.width >= 20 && r.height >= 20, "implausible face {r}");
        }
    }

    #[rstest]
    #[case::finest(1.05)]
    #[case::default(1.1)]
    #[case::coarse(1.5)]
    #[case::coarsest(2.0)]
    fn test_regions_within_bounds_across_params(#[case] scale_factor: f64) {
        let detector = bundled_detector();
        let gray = group_photo_gray();
        let (w, h) = (gray.width(), gray.height());
        for neighbors in [1, 5, 10] {
            let params = DetectionParams::new(scale_factor, neighbors);
            let regions = detector.detect(&gray, &params).unwrap();
            assert!(
                regions.iter().all(|r| r.is_within(w, h)),
                "out of bounds at scale_factor={scale_factor} min_neighbors={neighbors}"
            );
        }
    }

    #[test]
    fn test_repeated_detection_is_deterministic() {
        let detector = bundled_detector();
        let gray = group_photo_gray();
        let params = DetectionParams::default();
        let first = sorted(detector.detect(&gray, &params).unwrap());
        let second = sorted(detector.detect(&gray, &params).unwrap());
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_face_count_never_rises_with_min_neighbors() {
        let detector = bundled_detector();
        let gray = group_photo_gray();
        let counts: Vec<usize> = (MIN_NEIGHBORS..=MAX_NEIGHBORS)
            .map(|n| {
                detector
                    .detect(&gray, &DetectionParams::new(1.1, n))
                    .unwrap()
                    .len()
            })
            .collect();
        assert!(counts[0] > 0, "lowest threshold should find faces");
        assert!(
            counts.windows(2).all(|pair| pair[1] <= pair[0]),
            "counts rose with min_neighbors: {counts:?}"
        );
    }

    #[test]
    fn test_empty_image_returns_nothing() {
        let gray = GrayFrame::new(Vec::new(), 0, 0);
        assert!(bundled_detector()
            .detect(&gray, &DetectionParams::default())
            .unwrap()
            .is_empty());
    }
}

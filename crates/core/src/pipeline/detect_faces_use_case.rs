use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::export::domain::download_artifact::DownloadArtifact;
use crate::export::domain::image_encoder::ImageEncoder;
use crate::shared::color::RectColor;
use crate::shared::constants::CAPTION_DETECTED;
use crate::shared::frame::Frame;
use crate::shared::region::Region;
use crate::source::domain::image_decoder::ImageDecoder;
use crate::source::domain::image_source::{self, EncodedImage};

/// Current widget values for one user interaction.
#[derive(Clone, Copy, Debug)]
pub struct Interaction<'a> {
    pub upload: Option<&'a EncodedImage>,
    pub camera: Option<&'a EncodedImage>,
    pub params: DetectionParams,
    pub color: RectColor,
    /// Whether the user pressed "Detect Faces" in this interaction.
    pub detect: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    NoImage,
    ImageLoaded,
    FacesDetected,
}

/// What the presentation layer should show after an interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderDescription {
    pub image: Option<Frame>,
    pub caption: &'static str,
    /// Detected regions; `None` unless detection ran.
    pub faces: Option<Vec<Region>>,
    pub download: Option<DownloadArtifact>,
}

impl RenderDescription {
    pub fn empty() -> Self {
        Self {
            image: None,
            caption: "",
            faces: None,
            download: None,
        }
    }

    pub fn state(&self) -> ViewState {
        match (&self.image, &self.faces) {
            (None, _) => ViewState::NoImage,
            (Some(_), None) => ViewState::ImageLoaded,
            (Some(_), Some(_)) => ViewState::FacesDetected,
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.as_ref().map_or(0, Vec::len)
    }
}

/// Per-interaction request handler: resolve → decode → detect → annotate → encode.
///
/// Every call starts from a freshly decoded image, so nothing drawn by a
/// previous interaction can leak into the next one.
pub struct DetectFacesUseCase {
    decoder: Box<dyn ImageDecoder>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    encoder: Box<dyn ImageEncoder>,
}

impl DetectFacesUseCase {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        encoder: Box<dyn ImageEncoder>,
    ) -> Self {
        Self {
            decoder,
            detector,
            annotator,
            encoder,
        }
    }

    pub fn handle(
        &self,
        interaction: &Interaction<'_>,
    ) -> Result<RenderDescription, Box<dyn std::error::Error>> {
        let Some(source) = image_source::resolve(interaction.upload, interaction.camera) else {
            return Ok(RenderDescription::empty());
        };
        log::debug!("Using {} image ({} bytes)", source.kind, source.bytes.len());

        let mut frame = self.decoder.decode(source)?;
        if !interaction.detect {
            return Ok(RenderDescription {
                image: Some(frame),
                caption: source.kind.caption(),
                faces: None,
                download: None,
            });
        }

        let start = Instant::now();
        let gray = frame.to_grayscale();
        let faces = self.detector.detect(&gray, &interaction.params)?;
        let detect_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.annotator
            .annotate(&mut frame, &faces, interaction.color)?;
        let bytes = self.encoder.encode(&frame)?;

        log::info!(
            "Detected {} face(s) in {:.1} ms (scale_factor={}, min_neighbors={})",
            faces.len(),
            detect_ms,
            interaction.params.scale_factor(),
            interaction.params.min_neighbors()
        );

        Ok(RenderDescription {
            image: Some(frame),
            caption: CAPTION_DETECTED,
            faces: Some(faces),
            download: Some(DownloadArtifact::jpeg(bytes)),
        })
    }
}

use crate::detection::domain::detection_params::DetectionParams;
use crate::shared::frame::GrayFrame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Implementations behave as a pure function of `(image, params)`: no
/// state carries over between calls, hence `&self`. Returned regions lie
/// fully inside the image; their order is unspecified.
pub trait FaceDetector: Send {
    fn detect(
        &self,
        gray: &GrayFrame,
        params: &DetectionParams,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}

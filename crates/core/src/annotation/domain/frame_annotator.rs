use crate::shared::color::RectColor;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for marking detected regions on a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`).
pub trait FrameAnnotator: Send {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
        color: RectColor,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

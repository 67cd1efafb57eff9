use crate::shared::frame::Frame;
use crate::source::domain::image_source::EncodedImage;

/// Decodes an encoded image blob into an RGB [`Frame`].
pub trait ImageDecoder: Send {
    fn decode(&self, image: &EncodedImage) -> Result<Frame, Box<dyn std::error::Error>>;
}

use thiserror::Error;

use crate::export::domain::image_encoder::ImageEncoder;
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("cannot encode an image with zero width or height")]
    EmptyFrame,
    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

/// Baseline JPEG encoder using the `image` crate.
///
/// The encoder consumes RGB directly, so no channel reordering is needed.
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new(JPEG_QUALITY)
    }
}

impl ImageEncoder for JpegEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Err(EncodeError::EmptyFrame.into());
        }
        let mut bytes = Vec::new();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, self.quality);
        image::ImageEncoder::write_image(
            encoder,
            frame.data(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(EncodeError::from)?;
        Ok(bytes)
    }
}

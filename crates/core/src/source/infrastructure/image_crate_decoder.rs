use thiserror::Error;

use crate::shared::frame::Frame;
use crate::source::domain::image_decoder::ImageDecoder;
use crate::source::domain::image_source::{EncodedImage, SourceKind};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("the {kind} image is empty")]
    NoData { kind: SourceKind },
    #[error("failed to decode the {kind} image: {source}")]
    Decode {
        kind: SourceKind,
        #[source]
        source: image::ImageError,
    },
}

/// Decodes JPEG/PNG (or anything else the `image` crate can sniff) into RGB.
///
/// Alpha is discarded; palette and grayscale inputs are expanded to RGB.
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageCrateDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, image: &EncodedImage) -> Result<Frame, Box<dyn std::error::Error>> {
        let kind = image.kind;
        if image.bytes.is_empty() {
            return Err(DecodeError::NoData { kind }.into());
        }

        let rgb = image::load_from_memory(&image.bytes)
            .map_err(|source| DecodeError::Decode { kind, source })?
            .into_rgb8();
        let (width, height) = rgb.dimensions();
        log::debug!("Decoded {kind} image: {width}x{height}");

        Ok(Frame::new(rgb.into_raw(), width, height))
    }
}

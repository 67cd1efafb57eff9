use crate::shared::frame::Frame;

/// Encodes a frame into an in-memory image file.
pub trait ImageEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

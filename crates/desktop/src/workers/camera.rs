/// Grab one still from the default camera, PNG-encoded.
#[cfg(feature = "webcam")]
pub fn capture_still() -> Result<Vec<u8>, String> {
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;

    // Early frames are often dark while the sensor adjusts exposure
    const WARMUP_FRAMES: usize = 5;

    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera =
        Camera::new(CameraIndex::Index(0), format).map_err(|e| format!("No camera: {e}"))?;
    camera
        .open_stream()
        .map_err(|e| format!("Could not start camera: {e}"))?;

    let mut buffer = camera.frame().map_err(|e| format!("Capture failed: {e}"))?;
    for _ in 0..WARMUP_FRAMES {
        buffer = camera.frame().map_err(|e| format!("Capture failed: {e}"))?;
    }
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| format!("Could not decode camera frame: {e}"))?;
    if let Err(e) = camera.stop_stream() {
        log::warn!("Failed to stop camera stream: {e}");
    }
    let (width, height) = decoded.dimensions();
    let png = encode_png(width, height, decoded.into_raw())?;
    log::info!("Captured {width}x{height} still from camera");
    Ok(png)
}

/// PNG-encode a packed RGB8 frame, sized by the frame itself.
#[cfg(any(feature = "webcam", test))]
fn encode_png(width: u32, height: u32, rgb: Vec<u8>) -> Result<Vec<u8>, String> {
    use std::io::Cursor;

    let img = image::RgbImage::from_raw(width, height, rgb)
        .ok_or("Camera frame buffer is shorter than its dimensions")?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| format!("Could not encode camera frame: {e}"))?;
    Ok(png)
}

#[cfg(not(feature = "webcam"))]
pub fn capture_still() -> Result<Vec<u8>, String> {
    Err("Webcam support is not enabled in this build (rebuild with --features webcam)".into())
}

pub fn is_available() -> bool {
    cfg!(feature = "webcam")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_keeps_frame_dimensions() {
        let rgb = vec![200u8; 64 * 48 * 3];
        let png = encode_png(64, 48, rgb).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn test_encode_png_short_buffer_is_error() {
        assert!(encode_png(64, 48, vec![0u8; 10]).is_err());
    }
}

use std::fmt;

use crate::shared::constants::{CAPTION_CAPTURED, CAPTION_UPLOADED};

/// Input channel an encoded image arrived through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Upload,
    Camera,
}

impl SourceKind {
    pub fn caption(self) -> &'static str {
        match self {
            SourceKind::Upload => CAPTION_UPLOADED,
            SourceKind::Camera => CAPTION_CAPTURED,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Upload => write!(f, "uploaded"),
            SourceKind::Camera => write!(f, "captured"),
        }
    }
}

/// An encoded image blob (JPEG, PNG, ...) as delivered by an input channel.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub kind: SourceKind,
}

impl EncodedImage {
    pub fn upload(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            kind: SourceKind::Upload,
        }
    }

    pub fn camera(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            kind: SourceKind::Camera,
        }
    }
}

/// Picks the image to process from the two input channels.
///
/// An uploaded file takes precedence over a camera capture; with neither
/// present there is nothing to process.
pub fn resolve<'a>(
    upload: Option<&'a EncodedImage>,
    camera: Option<&'a EncodedImage>,
) -> Option<&'a EncodedImage> {
    upload.or(camera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_takes_precedence_over_camera() {
        let upload = EncodedImage::upload(vec![1, 2, 3]);
        let camera = EncodedImage::camera(vec![4, 5, 6]);
        let chosen = resolve(Some(&upload), Some(&camera)).unwrap();
        assert_eq!(chosen.kind, SourceKind::Upload);
        assert_eq!(chosen.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_camera_used_without_upload() {
        let camera = EncodedImage::camera(vec![4, 5, 6]);
        let chosen = resolve(None, Some(&camera)).unwrap();
        assert_eq!(chosen.kind, SourceKind::Camera);
    }

    #[test]
    fn test_upload_used_without_camera() {
        let upload = EncodedImage::upload(vec![7]);
        assert_eq!(resolve(Some(&upload), None), Some(&upload));
    }

    #[test]
    fn test_no_source_resolves_to_none() {
        assert!(resolve(None, None).is_none());
    }

    #[test]
    fn test_captions_depend_on_source() {
        assert_eq!(SourceKind::Upload.caption(), "Uploaded Image");
        assert_eq!(SourceKind::Camera.caption(), "Captured Image");
    }
}

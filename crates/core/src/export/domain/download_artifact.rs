use std::path::Path;

use crate::shared::constants::{OUTPUT_FILE_NAME, OUTPUT_MIME_TYPE};

/// An encoded result offered to the user for download.
///
/// Lives only in memory for the interaction that produced it; the caller
/// decides where (and whether) it is written.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadArtifact {
    pub bytes: Vec<u8>,
    pub file_name: &'static str,
    pub mime_type: &'static str,
}

impl DownloadArtifact {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: OUTPUT_FILE_NAME,
            mime_type: OUTPUT_MIME_TYPE,
        }
    }

    /// Write the artifact to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_artifact_metadata() {
        let artifact = DownloadArtifact::jpeg(vec![0xFF, 0xD8]);
        assert_eq!(artifact.file_name, "detected_faces.jpg");
        assert_eq!(artifact.mime_type, "image/jpeg");
        assert_eq!(artifact.bytes, vec![0xFF, 0xD8]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.jpg");
        DownloadArtifact::jpeg(vec![1, 2, 3]).save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        DownloadArtifact::jpeg(vec![1; 10]).save(&path).unwrap();
        DownloadArtifact::jpeg(vec![2; 3]).save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![2; 3]);
    }
}

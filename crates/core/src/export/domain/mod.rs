pub mod download_artifact;
pub mod image_encoder;

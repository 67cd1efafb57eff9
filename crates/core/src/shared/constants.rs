pub const FACE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const FACE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

pub const MIN_SCALE_FACTOR: f64 = 1.05;
pub const MAX_SCALE_FACTOR: f64 = 2.0;
pub const SCALE_FACTOR_STEP: f64 = 0.05;
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;

pub const MIN_NEIGHBORS: u32 = 1;
pub const MAX_NEIGHBORS: u32 = 10;
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;

pub const DEFAULT_RECT_COLOR: &str = "#00FF00";
pub const DEFAULT_STROKE_WIDTH: u32 = 2;

pub const OUTPUT_FILE_NAME: &str = "detected_faces.jpg";
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";
pub const JPEG_QUALITY: u8 = 95;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const CAPTION_DETECTED: &str = "Detected Faces";
pub const CAPTION_UPLOADED: &str = "Uploaded Image";
pub const CAPTION_CAPTURED: &str = "Captured Image";

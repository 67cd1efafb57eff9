use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facefinder_core::annotation::infrastructure::rectangle_annotator::RectangleAnnotator;
use facefinder_core::detection::domain::detection_params::DetectionParams;
use facefinder_core::detection::infrastructure::rustface_detector::RustfaceDetector;
use facefinder_core::export::infrastructure::jpeg_encoder::JpegEncoder;
use facefinder_core::pipeline::detect_faces_use_case::{DetectFacesUseCase, Interaction};
use facefinder_core::shared::color::RectColor;
use facefinder_core::shared::constants::{
    DEFAULT_MIN_NEIGHBORS, DEFAULT_RECT_COLOR, DEFAULT_SCALE_FACTOR, DEFAULT_STROKE_WIDTH,
    FACE_MODEL_NAME, FACE_MODEL_URL, IMAGE_EXTENSIONS, MAX_NEIGHBORS, MAX_SCALE_FACTOR,
    MIN_NEIGHBORS, MIN_SCALE_FACTOR, OUTPUT_FILE_NAME,
};
use facefinder_core::shared::model_resolver;
use facefinder_core::source::domain::image_source::EncodedImage;
use facefinder_core::source::infrastructure::image_crate_decoder::ImageCrateDecoder;

/// Detect frontal faces in an image and save a copy with the faces outlined.
#[derive(Parser)]
#[command(name = "facefinder", version)]
struct Cli {
    /// Image to process (jpg, jpeg, png).
    input: Option<PathBuf>,

    /// Still captured from a camera; used only when no INPUT is given.
    #[arg(long)]
    capture: Option<PathBuf>,

    /// Where to save the annotated JPEG.
    #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
    output: PathBuf,

    /// Step between scanned scales (1.05-2.0). Larger is faster but finds fewer faces.
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Evidence a face needs (1-10). Larger means fewer false positives.
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: u32,

    /// Rectangle color as #RRGGBB.
    #[arg(long, default_value = DEFAULT_RECT_COLOR)]
    color: String,

    /// Rectangle stroke width in pixels.
    #[arg(long, default_value_t = DEFAULT_STROKE_WIDTH)]
    stroke: u32,

    /// Directory holding the face model; checked before the download cache.
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let color = validate(&cli)?;

    let upload = cli.input.as_deref().map(read_image).transpose()?.map(EncodedImage::upload);
    let camera = cli
        .capture
        .as_deref()
        .map(read_image)
        .transpose()?
        .map(EncodedImage::camera);

    let use_case = build_use_case(&cli)?;
    let render = use_case.handle(&Interaction {
        upload: upload.as_ref(),
        camera: camera.as_ref(),
        params: DetectionParams::new(cli.scale_factor, cli.min_neighbors),
        color,
        detect: true,
    })?;

    let faces = render.faces.unwrap_or_default();
    log::info!("Found {} face(s)", faces.len());
    for (i, face) in faces.iter().enumerate() {
        log::info!("  face {}: {face}", i + 1);
    }

    let artifact = render.download.ok_or("No image was processed")?;
    artifact.save(&cli.output)?;
    println!(
        "{} face(s) detected, saved {} ({})",
        faces.len(),
        cli.output.display(),
        artifact.mime_type
    );
    Ok(())
}

fn build_use_case(cli: &Cli) -> Result<DetectFacesUseCase, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        cli.model_dir.as_deref(),
        Some(Box::new(download_progress)),
    )?;

    Ok(DetectFacesUseCase::new(
        Box::new(ImageCrateDecoder::new()),
        Box::new(RustfaceDetector::from_file(&model_path)?),
        Box::new(RectangleAnnotator::new(cli.stroke)),
        Box::new(JpegEncoder::default()),
    ))
}

fn validate(cli: &Cli) -> Result<RectColor, Box<dyn std::error::Error>> {
    if cli.input.is_none() && cli.capture.is_none() {
        return Err("An input image or --capture file is required".into());
    }
    for path in cli.input.iter().chain(cli.capture.iter()) {
        if !path.exists() {
            return Err(format!("Input file not found: {}", path.display()).into());
        }
        if !is_image(path) {
            return Err(format!(
                "Unsupported file type: {} (expected {})",
                path.display(),
                IMAGE_EXTENSIONS.join(", ")
            )
            .into());
        }
    }
    if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&cli.scale_factor) {
        return Err(format!(
            "Scale factor must be between {MIN_SCALE_FACTOR} and {MAX_SCALE_FACTOR}, got {}",
            cli.scale_factor
        )
        .into());
    }
    if !(MIN_NEIGHBORS..=MAX_NEIGHBORS).contains(&cli.min_neighbors) {
        return Err(format!(
            "Min neighbors must be between {MIN_NEIGHBORS} and {MAX_NEIGHBORS}, got {}",
            cli.min_neighbors
        )
        .into());
    }
    if cli.stroke == 0 {
        return Err("Stroke width must be at least 1".into());
    }
    Ok(RectColor::from_hex(&cli.color)?)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn read_image(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    std::fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

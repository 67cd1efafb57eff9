use std::thread;

use crossbeam_channel::{Receiver, Sender};

use facefinder_core::detection::infrastructure::rustface_detector::RustfaceDetector;
use facefinder_core::shared::constants::{FACE_MODEL_NAME, FACE_MODEL_URL};
use facefinder_core::shared::model_resolver;

/// Progress reported by the background model loader.
pub enum LoaderMessage {
    /// Bytes downloaded so far and the total (0 when unknown).
    Progress(u64, u64),
    Ready(RustfaceDetector),
    Failed(String),
}

/// Resolve and parse the face model on a background thread.
///
/// The returned receiver yields any number of `Progress` messages followed by
/// exactly one `Ready` or `Failed`.
pub fn spawn() -> Receiver<LoaderMessage> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || load(tx));
    rx
}

fn load(tx: Sender<LoaderMessage>) {
    let progress_tx = tx.clone();
    let result = model_resolver::resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        None,
        Some(Box::new(move |downloaded, total| {
            let _ = progress_tx.send(LoaderMessage::Progress(downloaded, total));
        })),
    )
    .map_err(|e| e.to_string())
    .and_then(|path| RustfaceDetector::from_file(&path).map_err(|e| e.to_string()));

    let message = match result {
        Ok(detector) => {
            log::info!("Face model ready");
            LoaderMessage::Ready(detector)
        }
        Err(e) => {
            log::error!("Face model unavailable: {e}");
            LoaderMessage::Failed(e)
        }
    };
    let _ = tx.send(message);
}

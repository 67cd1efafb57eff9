use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use facefinder_core::annotation::infrastructure::rectangle_annotator::RectangleAnnotator;
use facefinder_core::detection::domain::detection_params::DetectionParams;
use facefinder_core::detection::domain::face_detector::FaceDetector;
use facefinder_core::export::infrastructure::jpeg_encoder::JpegEncoder;
use facefinder_core::pipeline::detect_faces_use_case::{
    DetectFacesUseCase, Interaction, RenderDescription, ViewState,
};
use facefinder_core::shared::color::RectColor;
use facefinder_core::shared::constants::{
    DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR, IMAGE_EXTENSIONS, OUTPUT_FILE_NAME,
};
use facefinder_core::shared::frame::{Frame, GrayFrame};
use facefinder_core::shared::region::Region;
use facefinder_core::source::domain::image_source::EncodedImage;
use facefinder_core::source::infrastructure::image_crate_decoder::ImageCrateDecoder;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;
use crate::workers::camera;
use crate::workers::model_loader::{self, LoaderMessage};

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Main,
    Appearance,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Main, Tab::Appearance, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Main => "Main",
            Tab::Appearance => "Appearance",
            Tab::About => "About",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    SelectUpload,
    UploadSelected(Option<(String, Vec<u8>)>),
    ClearUpload,
    CaptureCamera,
    ClearCapture,
    ScaleFactorChanged(f64),
    MinNeighborsChanged(u32),
    ColorInputChanged(String),
    ColorPicked(RectColor),
    RestoreDefaults,
    DetectFaces,
    Download,
    DownloadTargetSelected(Option<PathBuf>),
    ShowInFolder,
    AppearanceChanged(Appearance),
    FontScaleChanged(f32),
    PollModel,
    PollSystemTheme,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct UploadedFile {
    pub name: String,
    pub image: EncodedImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    Loading { downloaded: u64, total: u64 },
    Ready,
    Failed(String),
}

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    pub upload: Option<UploadedFile>,
    pub camera: Option<EncodedImage>,
    pub scale_factor: f64,
    pub min_neighbors: u32,
    /// Last valid colour; the text field may hold an incomplete edit.
    pub color: RectColor,
    pub color_input: String,
    pub color_error: Option<String>,
    pub model: ModelStatus,
    loader: Option<Receiver<LoaderMessage>>,
    use_case: DetectFacesUseCase,
    pub render: RenderDescription,
    pub preview: Option<image::Handle>,
    pub error: Option<String>,
    pub saved_to: Option<PathBuf>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let mut app = Self::with_detector(Box::new(ModelPending));
        app.settings = Settings::load();
        app.loader = Some(model_loader::spawn());
        (app, Task::none())
    }

    fn with_detector(detector: Box<dyn FaceDetector>) -> Self {
        let color = RectColor::default();
        Self {
            active_tab: Tab::Main,
            settings: Settings::default(),
            upload: None,
            camera: None,
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            color,
            color_input: color.to_hex(),
            color_error: None,
            model: ModelStatus::Loading {
                downloaded: 0,
                total: 0,
            },
            loader: None,
            use_case: build_use_case(detector),
            render: RenderDescription::empty(),
            preview: None,
            error: None,
            saved_to: None,
        }
    }

    pub fn has_source(&self) -> bool {
        self.upload.is_some() || self.camera.is_some()
    }

    pub fn can_detect(&self) -> bool {
        self.has_source() && self.model == ModelStatus::Ready
    }

    pub fn view_state(&self) -> ViewState {
        self.render.state()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::SelectUpload => {
                return Task::perform(
                    async {
                        let handle = rfd::AsyncFileDialog::new()
                            .set_title("Upload an image")
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file()
                            .await?;
                        Some((handle.file_name(), handle.read().await))
                    },
                    Message::UploadSelected,
                );
            }
            Message::UploadSelected(Some((name, bytes))) => {
                log::info!("Uploaded {name} ({} bytes)", bytes.len());
                self.upload = Some(UploadedFile {
                    name,
                    image: EncodedImage::upload(bytes),
                });
                self.refresh(false);
            }
            Message::UploadSelected(None) => {}
            Message::ClearUpload => {
                self.upload = None;
                self.refresh(false);
            }
            Message::CaptureCamera => match camera::capture_still() {
                Ok(bytes) => {
                    self.camera = Some(EncodedImage::camera(bytes));
                    self.refresh(false);
                }
                Err(e) => {
                    log::warn!("Camera capture failed: {e}");
                    self.error = Some(e);
                }
            },
            Message::ClearCapture => {
                self.camera = None;
                self.refresh(false);
            }
            Message::ScaleFactorChanged(value) => {
                self.scale_factor = value;
                self.refresh(false);
            }
            Message::MinNeighborsChanged(value) => {
                self.min_neighbors = value;
                self.refresh(false);
            }
            Message::ColorInputChanged(input) => {
                match RectColor::from_hex(&input) {
                    Ok(color) => {
                        self.color = color;
                        self.color_error = None;
                        self.refresh(false);
                    }
                    Err(e) => self.color_error = Some(e.to_string()),
                }
                self.color_input = input;
            }
            Message::ColorPicked(color) => {
                self.set_color(color);
                self.refresh(false);
            }
            Message::RestoreDefaults => {
                self.scale_factor = DEFAULT_SCALE_FACTOR;
                self.min_neighbors = DEFAULT_MIN_NEIGHBORS;
                self.set_color(RectColor::default());
                self.refresh(false);
            }
            Message::DetectFaces => {
                if self.can_detect() {
                    self.refresh(true);
                }
            }
            Message::Download => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Save processed image")
                            .set_file_name(OUTPUT_FILE_NAME)
                            .add_filter("JPEG image", &["jpg", "jpeg"])
                            .save_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::DownloadTargetSelected,
                );
            }
            Message::DownloadTargetSelected(Some(path)) => self.save_download(path),
            Message::DownloadTargetSelected(None) => {}
            Message::ShowInFolder => {
                if let Some(dir) = self.saved_to.as_ref().and_then(|p| p.parent()) {
                    if let Err(e) = open::that(dir) {
                        log::warn!("Could not open {}: {e}", dir.display());
                    }
                }
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::PollModel => self.poll_model(),
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
        }
        Task::none()
    }

    /// Re-derive everything shown from the current widget values.
    fn refresh(&mut self, detect: bool) {
        self.saved_to = None;
        let interaction = Interaction {
            upload: self.upload.as_ref().map(|u| &u.image),
            camera: self.camera.as_ref(),
            params: DetectionParams::new(self.scale_factor, self.min_neighbors),
            color: self.color,
            detect,
        };
        match self.use_case.handle(&interaction) {
            Ok(render) => {
                self.preview = render.image.as_ref().map(to_handle);
                self.render = render;
                self.error = None;
            }
            Err(e) => {
                log::error!("Processing failed: {e}");
                self.render = RenderDescription::empty();
                self.preview = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn set_color(&mut self, color: RectColor) {
        self.color = color;
        self.color_input = color.to_hex();
        self.color_error = None;
    }

    fn save_download(&mut self, path: PathBuf) {
        let Some(ref artifact) = self.render.download else {
            return;
        };
        match artifact.save(&path) {
            Ok(()) => {
                log::info!("Saved {} bytes to {}", artifact.bytes.len(), path.display());
                self.saved_to = Some(path);
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", path.display());
                self.error = Some(format!("Could not save {}: {e}", path.display()));
            }
        }
    }

    fn poll_model(&mut self) {
        let Some(ref rx) = self.loader else {
            return;
        };
        let mut finished = false;
        for message in rx.try_iter() {
            match message {
                LoaderMessage::Progress(downloaded, total) => {
                    self.model = ModelStatus::Loading { downloaded, total };
                }
                LoaderMessage::Ready(detector) => {
                    self.use_case = build_use_case(Box::new(detector));
                    self.model = ModelStatus::Ready;
                    finished = true;
                }
                LoaderMessage::Failed(e) => {
                    self.model = ModelStatus::Failed(e);
                    finished = true;
                }
            }
        }
        if finished {
            self.loader = None;
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;
        let theme = self.theme();

        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Main => tabs::main_tab::view(self, &theme),
            Tab::Appearance => tabs::appearance_tab::view(&self.settings),
            Tab::About => tabs::about_tab::view(fs, camera::is_available()),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let model = if self.loader.is_some() {
            iced::time::every(Duration::from_millis(100)).map(|_| Message::PollModel)
        } else {
            Subscription::none()
        };
        let system_theme = if self.settings.appearance == Appearance::System {
            iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme)
        } else {
            Subscription::none()
        };
        Subscription::batch([model, system_theme])
    }
}

fn build_use_case(detector: Box<dyn FaceDetector>) -> DetectFacesUseCase {
    DetectFacesUseCase::new(
        Box::new(ImageCrateDecoder::new()),
        detector,
        Box::new(RectangleAnnotator::default()),
        Box::new(JpegEncoder::default()),
    )
}

fn to_handle(frame: &Frame) -> image::Handle {
    image::Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba())
}

/// Stands in until the background loader delivers the real detector.
struct ModelPending;

impl FaceDetector for ModelPending {
    fn detect(
        &self,
        _gray: &GrayFrame,
        _params: &DetectionParams,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        Err("The face model is still loading".into())
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reports one face covering the top-left quarter.
    struct QuarterDetector;

    impl FaceDetector for QuarterDetector {
        fn detect(
            &self,
            gray: &GrayFrame,
            _params: &DetectionParams,
        ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            let (w, h) = (gray.width() as i32, gray.height() as i32);
            Ok(vec![Region::new(0, 0, w / 2, h / 2)])
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ::image::RgbImage::from_pixel(width, height, ::image::Rgb([90, 90, 90]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ::image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn ready_app() -> App {
        let mut app = App::with_detector(Box::new(QuarterDetector));
        app.model = ModelStatus::Ready;
        app
    }

    fn with_upload(mut app: App) -> App {
        let _ = app.update(Message::UploadSelected(Some((
            "photo.png".into(),
            png_bytes(40, 30),
        ))));
        app
    }

    #[test]
    fn test_upload_shows_image_without_download() {
        let app = with_upload(ready_app());
        assert_eq!(app.view_state(), ViewState::ImageLoaded);
        assert!(app.preview.is_some());
        assert_eq!(app.render.caption, "Uploaded Image");
        assert!(app.render.download.is_none());
    }

    #[test]
    fn test_detect_produces_download() {
        let mut app = with_upload(ready_app());
        let _ = app.update(Message::DetectFaces);
        assert_eq!(app.view_state(), ViewState::FacesDetected);
        assert_eq!(app.render.caption, "Detected Faces");
        assert_eq!(app.render.face_count(), 1);
        assert!(app.render.download.is_some());
    }

    #[test]
    fn test_parameter_change_drops_previous_result() {
        let mut app = with_upload(ready_app());
        let _ = app.update(Message::DetectFaces);
        let _ = app.update(Message::MinNeighborsChanged(3));
        assert_eq!(app.view_state(), ViewState::ImageLoaded);
        assert!(app.render.download.is_none());
        assert!(app.render.faces.is_none());
    }

    #[test]
    fn test_detect_disabled_while_model_loading() {
        let mut app = with_upload(App::with_detector(Box::new(ModelPending)));
        assert!(!app.can_detect());
        let _ = app.update(Message::DetectFaces);
        assert!(app.render.faces.is_none());
        assert!(app.error.is_none());
    }

    #[test]
    fn test_invalid_hex_keeps_last_valid_color() {
        let mut app = ready_app();
        let _ = app.update(Message::ColorInputChanged("#FF00".into()));
        assert_eq!(app.color, RectColor::GREEN);
        assert!(app.color_error.is_some());
        assert_eq!(app.color_input, "#FF00");

        let _ = app.update(Message::ColorInputChanged("#FF0000".into()));
        assert_eq!(app.color, RectColor::new(255, 0, 0));
        assert!(app.color_error.is_none());
    }

    #[test]
    fn test_restore_defaults() {
        let mut app = ready_app();
        let _ = app.update(Message::ScaleFactorChanged(1.5));
        let _ = app.update(Message::MinNeighborsChanged(9));
        let _ = app.update(Message::ColorPicked(RectColor::new(255, 0, 255)));
        let _ = app.update(Message::RestoreDefaults);
        assert_eq!(app.scale_factor, DEFAULT_SCALE_FACTOR);
        assert_eq!(app.min_neighbors, DEFAULT_MIN_NEIGHBORS);
        assert_eq!(app.color, RectColor::GREEN);
        assert_eq!(app.color_input, "#00FF00");
    }

    #[test]
    fn test_corrupt_upload_reports_error() {
        let mut app = ready_app();
        let _ = app.update(Message::UploadSelected(Some((
            "broken.png".into(),
            vec![1, 2, 3],
        ))));
        assert!(app.error.is_some());
        assert!(app.preview.is_none());
    }

    #[test]
    fn test_clearing_last_source_resets_view() {
        let mut app = with_upload(ready_app());
        let _ = app.update(Message::ClearUpload);
        assert_eq!(app.view_state(), ViewState::NoImage);
        assert!(app.preview.is_none());
        assert!(!app.has_source());
    }

    #[test]
    fn test_save_download_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut app = with_upload(ready_app());
        let _ = app.update(Message::DetectFaces);
        let _ = app.update(Message::DownloadTargetSelected(Some(path.clone())));
        assert_eq!(app.saved_to.as_deref(), Some(path.as_path()));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_scaled_rounds() {
        assert_eq!(scaled(13.0, 1.0), 13.0);
        assert_eq!(scaled(13.0, 1.25), 16.0);
    }
}

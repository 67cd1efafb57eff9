use iced::widget::{button, column, container, row, slider, text, text_input, Space};
use iced::{Color, Element, Length, Theme};

use facefinder_core::pipeline::detect_faces_use_case::ViewState;
use facefinder_core::shared::constants::{
    CAPTION_CAPTURED, CAPTION_UPLOADED, DEFAULT_RECT_COLOR, MAX_NEIGHBORS, MAX_SCALE_FACTOR,
    MIN_NEIGHBORS, MIN_SCALE_FACTOR, OUTPUT_FILE_NAME, SCALE_FACTOR_STEP,
};

use crate::app::{scaled, App, Message, ModelStatus};
use crate::theme::{surface_color, tertiary_color};
use crate::widgets::buttons;
use crate::widgets::color_swatch::swatch_row;
use crate::widgets::preview::preview;
use crate::widgets::source_card::{source_card, SourceCard};
use crate::workers::camera;

const SIDEBAR_WIDTH: f32 = 250.0;

const INSTRUCTIONS: &[&str] = &[
    "Upload an image or capture from your webcam.",
    "Choose the rectangle color for detected faces.",
    "Adjust Scale Factor and Min Neighbors for detection sensitivity.",
    "Click Detect Faces to run detection.",
    "Save the processed image if you like the result.",
];

pub fn view<'a>(app: &'a App, theme: &Theme) -> Element<'a, Message> {
    let fs = app.settings.font_scale;
    row![sidebar(app, fs, theme), content(app, fs, theme)]
        .spacing(16)
        .into()
}

fn sidebar<'a>(app: &'a App, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);
    let danger = theme.palette().danger;

    let mut color_section = column![
        text("Rectangle Color").size(scaled(13.0, fs)),
        row![
            container(Space::new().width(18).height(18)).style({
                let fill = crate::widgets::color_swatch::to_iced(app.color);
                move |_theme: &Theme| container::Style {
                    background: Some(fill.into()),
                    border: iced::border::Border {
                        color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                        width: 1.0,
                        radius: 4.0.into(),
                    },
                    ..container::Style::default()
                }
            }),
            text_input(DEFAULT_RECT_COLOR, &app.color_input)
                .on_input(Message::ColorInputChanged)
                .size(scaled(13.0, fs))
                .width(Length::Fill),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
        swatch_row(app.color),
    ]
    .spacing(8);
    if let Some(ref err) = app.color_error {
        color_section = color_section.push(
            text(err.as_str())
                .size(scaled(11.0, fs))
                .color(danger),
        );
    }

    let panel = column![
        text("Detection Settings").size(scaled(16.0, fs)),
        Space::new().height(14),
        labelled_value("Scale Factor", format!("{:.2}", app.scale_factor), fs),
        slider(
            MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR,
            app.scale_factor,
            Message::ScaleFactorChanged
        )
        .step(SCALE_FACTOR_STEP),
        text("Step between scanned sizes. Larger is faster but misses more faces.")
            .size(scaled(11.0, fs))
            .color(tertiary),
        Space::new().height(14),
        labelled_value("Min Neighbors", app.min_neighbors.to_string(), fs),
        slider(
            MIN_NEIGHBORS..=MAX_NEIGHBORS,
            app.min_neighbors,
            Message::MinNeighborsChanged
        ),
        text("Evidence needed per face. Larger means fewer false positives.")
            .size(scaled(11.0, fs))
            .color(tertiary),
        Space::new().height(14),
        color_section,
        Space::new().height(18),
        button(text("Restore Defaults").size(scaled(13.0, fs)))
            .on_press(Message::RestoreDefaults)
            .padding([6, 14])
            .style(buttons::secondary),
    ]
    .spacing(6);

    container(panel)
        .width(SIDEBAR_WIDTH)
        .padding(14)
        .style(move |_theme: &Theme| container::Style {
            background: Some(surface.into()),
            border: iced::border::Border {
                radius: 12.0.into(),
                ..iced::border::Border::default()
            },
            ..container::Style::default()
        })
        .into()
}

fn content<'a>(app: &'a App, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);

    let instructions = INSTRUCTIONS
        .iter()
        .enumerate()
        .fold(column![].spacing(3), |col, (i, step)| {
            col.push(text(format!("{}. {step}", i + 1)).size(scaled(13.0, fs)))
        });

    let upload = source_card(
        SourceCard {
            label: CAPTION_UPLOADED,
            loaded: app.upload.as_ref().map(|u| u.name.clone()),
            action: "Upload an image",
            on_action: Some(Message::SelectUpload),
            on_clear: Message::ClearUpload,
        },
        fs,
        theme,
    );
    let capture = source_card(
        SourceCard {
            label: CAPTION_CAPTURED,
            loaded: app.camera.as_ref().map(|c| format!("Still, {} KB", c.bytes.len() / 1024)),
            action: "Capture from webcam",
            on_action: camera::is_available().then_some(Message::CaptureCamera),
            on_clear: Message::ClearCapture,
        },
        fs,
        theme,
    );

    let detect = button(text("Detect Faces").size(scaled(15.0, fs)))
        .on_press_maybe(app.can_detect().then_some(Message::DetectFaces))
        .padding([10, 24])
        .style(buttons::primary);

    let mut col = column![
        text("Face Detection").size(scaled(22.0, fs)),
        Space::new().height(8),
        text("Instructions").size(scaled(15.0, fs)),
        instructions,
        Space::new().height(16),
        text("Choose Input").size(scaled(15.0, fs)),
        upload,
        capture,
        Space::new().height(8),
        row![detect, model_status(&app.model, fs, tertiary)]
            .spacing(12)
            .align_y(iced::Alignment::Center),
    ]
    .spacing(8)
    .width(Length::Fill);

    if let Some(ref err) = app.error {
        col = col.push(error_panel(err.as_str(), fs));
    }

    let state = app.view_state();
    if let (ViewState::ImageLoaded | ViewState::FacesDetected, Some(handle)) =
        (state, app.preview.as_ref())
    {
        let faces = (state == ViewState::FacesDetected).then(|| app.render.face_count());
        col = col.push(Space::new().height(8));
        col = col.push(preview(handle, app.render.caption, faces, fs, theme));
    }

    if state == ViewState::FacesDetected {
        let download = button(text("Download Processed Image").size(scaled(14.0, fs)))
            .on_press(Message::Download)
            .padding([8, 18])
            .style(buttons::secondary);
        col = col.push(download);
    }

    if let Some(ref path) = app.saved_to {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| OUTPUT_FILE_NAME.to_string());
        col = col.push(
            row![
                text(format!("Saved as {name}"))
                    .size(scaled(13.0, fs))
                    .color(tertiary),
                button(text("Show in Folder").size(scaled(13.0, fs)))
                    .on_press(Message::ShowInFolder)
                    .style(button::text),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        );
    }

    col.into()
}

fn labelled_value<'a>(label: &'a str, value: String, fs: f32) -> Element<'a, Message> {
    row![
        text(label).size(scaled(13.0, fs)).width(Length::Fill),
        text(value).size(scaled(13.0, fs)),
    ]
    .into()
}

fn model_status<'a>(status: &ModelStatus, fs: f32, tertiary: Color) -> Element<'a, Message> {
    let message = match status {
        ModelStatus::Ready => return Space::new().into(),
        ModelStatus::Loading { downloaded, total } if *total > 0 => format!(
            "Downloading face model... {:.0}%",
            *downloaded as f64 / *total as f64 * 100.0
        ),
        ModelStatus::Loading { .. } => "Loading face model...".to_string(),
        ModelStatus::Failed(e) => format!("Face model unavailable: {e}"),
    };
    text(message).size(scaled(12.0, fs)).color(tertiary).into()
}

fn error_panel<'a>(message: &'a str, fs: f32) -> Element<'a, Message> {
    container(text(message).size(scaled(13.0, fs)))
        .padding([10, 14])
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let danger = theme.palette().danger;
            container::Style {
                background: Some(Color { a: 0.12, ..danger }.into()),
                border: iced::border::Border {
                    color: Color { a: 0.5, ..danger },
                    width: 1.0,
                    radius: 8.0.into(),
                },
                text_color: Some(danger),
                ..container::Style::default()
            }
        })
        .into()
}

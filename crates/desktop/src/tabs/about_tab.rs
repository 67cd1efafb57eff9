use iced::widget::{column, text, Space};
use iced::Element;

use crate::app::{scaled, Message};

pub fn view(fs: f32, webcam: bool) -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");
    let camera = if webcam {
        "Webcam capture: enabled"
    } else {
        "Webcam capture: not included in this build"
    };

    column![
        text("Face Finder").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Finds frontal faces with a multi-scale cascade classifier and \
             outlines each one. Images never leave this computer; the only \
             network access is the one-time download of the face model."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(12),
        text(camera).size(scaled(13.0, fs)),
        Space::new().height(4),
        text("Logs: set RUST_LOG=info before launching.").size(scaled(13.0, fs)),
    ]
    .into()
}

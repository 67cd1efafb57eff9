use iced::widget::{column, container, image, stack, text};
use iced::{Color, ContentFit, Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;

const BADGE_RADIUS: f32 = 10.0;

/// The current image, full width, with its caption underneath.
///
/// `faces` adds a count badge in the top-left corner once detection has run.
pub fn preview<'a>(
    handle: &image::Handle,
    caption: &'a str,
    faces: Option<usize>,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let img = image(handle.clone())
        .width(Length::Fill)
        .content_fit(ContentFit::Contain);

    let picture: Element<'a, Message> = match faces {
        Some(count) => {
            let badge = container(
                text(face_label(count))
                    .size(scaled(12.0, fs))
                    .color(Color::WHITE)
                    .font(iced::Font {
                        weight: iced::font::Weight::Semibold,
                        ..iced::Font::DEFAULT
                    }),
            )
            .padding([3, 8])
            .style(|_theme: &Theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                border: iced::border::Border {
                    radius: BADGE_RADIUS.into(),
                    ..iced::border::Border::default()
                },
                ..container::Style::default()
            });
            stack![img, container(badge).padding(8)].into()
        }
        None => img.into(),
    };

    column![
        picture,
        container(
            text(caption)
                .size(scaled(13.0, fs))
                .color(tertiary_color(theme))
        )
        .center_x(Length::Fill)
    ]
    .spacing(6)
    .into()
}

pub fn face_label(count: usize) -> String {
    match count {
        0 => "No faces found".to_string(),
        1 => "1 face".to_string(),
        n => format!("{n} faces"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_label_pluralises() {
        assert_eq!(face_label(0), "No faces found");
        assert_eq!(face_label(1), "1 face");
        assert_eq!(face_label(4), "4 faces");
    }
}

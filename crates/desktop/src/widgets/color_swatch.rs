use iced::border::Border;
use iced::widget::{button, row, Space};
use iced::{Color, Element, Theme};

use facefinder_core::shared::color::RectColor;

use crate::app::Message;

const SWATCH_SIZE: f32 = 22.0;
const CORNER_RADIUS: f32 = 6.0;

/// Quick picks offered next to the hex field.
pub const PRESETS: &[RectColor] = &[
    RectColor::GREEN,
    RectColor::new(255, 0, 0),
    RectColor::new(0, 122, 255),
    RectColor::new(255, 204, 0),
    RectColor::new(255, 0, 255),
    RectColor::new(255, 255, 255),
];

pub fn swatch_row<'a>(selected: RectColor) -> Element<'a, Message> {
    row(PRESETS
        .iter()
        .map(|&color| swatch(color, color == selected))
        .collect::<Vec<_>>())
    .spacing(6)
    .into()
}

fn swatch<'a>(color: RectColor, selected: bool) -> Element<'a, Message> {
    let fill = to_iced(color);
    button(Space::new().width(SWATCH_SIZE).height(SWATCH_SIZE))
        .on_press(Message::ColorPicked(color))
        .padding(0)
        .style(move |theme: &Theme, _status| {
            let palette = theme.palette();
            button::Style {
                background: Some(fill.into()),
                border: Border {
                    color: if selected {
                        palette.primary
                    } else {
                        Color {
                            a: 0.2,
                            ..palette.text
                        }
                    },
                    width: if selected { 2.5 } else { 1.0 },
                    radius: CORNER_RADIUS.into(),
                },
                ..button::Style::default()
            }
        })
        .into()
}

pub fn to_iced(color: RectColor) -> Color {
    Color::from_rgb8(color.red, color.green, color.blue)
}

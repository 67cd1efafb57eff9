use iced::border::Border;
use iced::widget::button;
use iced::{Color, Shadow, Theme, Vector};

const CORNER_RADIUS: f32 = 10.0;
const CORNER_RADIUS_SM: f32 = 8.0;
const HOVER_DARKEN: f32 = 0.05;

/// Filled accent button for the main action on a screen.
pub fn primary(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().primary.base.color;
    let (background, shadow_alpha) = match status {
        button::Status::Active => (base, 0.25),
        button::Status::Hovered => (darken(base, 1.0), 0.35),
        button::Status::Pressed => (darken(base, 2.0), 0.35),
        button::Status::Disabled => (Color { a: 0.4, ..base }, 0.0),
    };
    button::Style {
        background: Some(background.into()),
        text_color: Color::WHITE,
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color {
                a: shadow_alpha,
                ..base
            },
            offset: Vector::new(0.0, 3.0),
            blur_radius: 10.0,
        },
        ..button::Style::default()
    }
}

/// Outlined button for secondary actions.
pub fn secondary(theme: &Theme, status: button::Status) -> button::Style {
    let text = theme.palette().text;
    let (fill, border_alpha) = match status {
        button::Status::Hovered | button::Status::Pressed => (0.08, 0.25),
        _ => (0.03, 0.15),
    };
    button::Style {
        background: Some(Color { a: fill, ..text }.into()),
        text_color: if status == button::Status::Disabled {
            Color { a: 0.4, ..text }
        } else {
            text
        },
        border: Border {
            color: Color {
                a: border_alpha,
                ..text
            },
            width: 1.0,
            radius: CORNER_RADIUS_SM.into(),
        },
        ..button::Style::default()
    }
}

fn darken(color: Color, amount: f32) -> Color {
    let shift = HOVER_DARKEN * amount;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: 1.0,
    }
}

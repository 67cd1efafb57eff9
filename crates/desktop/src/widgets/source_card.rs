use iced::widget::{button, column, container, row, text, Space};
use iced::{Color, Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::{surface_color, tertiary_color};
use crate::widgets::buttons;

const CORNER_RADIUS: f32 = 12.0;

/// One image source (upload or camera) with its current state and actions.
pub struct SourceCard<'a> {
    pub label: &'a str,
    /// Short description of what is loaded, `None` when empty.
    pub loaded: Option<String>,
    pub action: &'a str,
    /// `None` renders the action disabled.
    pub on_action: Option<Message>,
    pub on_clear: Message,
}

pub fn source_card<'a>(card: SourceCard<'a>, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);
    let border = border_color(theme);
    let is_loaded = card.loaded.is_some();

    let display_text: Element<'a, Message> = match card.loaded {
        Some(name) => text(name)
            .size(scaled(15.0, fs))
            .font(iced::Font {
                weight: iced::font::Weight::Medium,
                ..iced::Font::DEFAULT
            })
            .into(),
        None => text("Nothing yet")
            .size(scaled(15.0, fs))
            .color(tertiary)
            .into(),
    };

    let label_text = text(card.label.to_uppercase())
        .size(scaled(12.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Semibold,
            ..iced::Font::DEFAULT
        })
        .color(tertiary);

    let info = column![label_text, Space::new().height(2), display_text].width(Length::Fill);

    let action = button(text(card.action).size(scaled(13.0, fs)))
        .on_press_maybe(card.on_action)
        .padding([6, 14])
        .style(buttons::secondary);

    let mut actions = row![action].spacing(6);
    if is_loaded {
        actions = actions.push(
            button(text("Clear").size(scaled(13.0, fs)))
                .on_press(card.on_clear)
                .padding([6, 10])
                .style(button::text),
        );
    }

    container(row![info, actions].spacing(8).align_y(iced::Alignment::Center))
        .padding([12, 14])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(surface.into()),
            border: iced::border::Border {
                color: border,
                width: 1.0,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn border_color(theme: &Theme) -> Color {
    Color {
        a: 0.12,
        ..theme.palette().text
    }
}

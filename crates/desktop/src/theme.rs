use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

/// Resolve the iced Theme from the appearance setting.
pub fn resolve_theme(appearance: Appearance) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    if is_dark {
        Theme::custom("FaceFinder Dark", dark_palette())
    } else {
        Theme::custom("FaceFinder Light", light_palette())
    }
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x18, 0x1a, 0x1b),
        text: color!(0xd8, 0xdc, 0xde),
        primary: color!(0x3f, 0xb9, 0x6b),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf6, 0xf7, 0xf6),
        text: color!(0x1b, 0x1f, 0x1d),
        primary: color!(0x1f, 0x8f, 0x4e),
        success: color!(0x34, 0xc7, 0x59),
        warning: color!(0xff, 0x9f, 0x0a),
        danger: color!(0xd7, 0x26, 0x1e),
    }
}

/// Secondary text (captions, hints).
pub fn tertiary_color(theme: &Theme) -> Color {
    Color {
        a: 0.55,
        ..theme.palette().text
    }
}

/// Slightly raised panel background (sidebar, cards).
pub fn surface_color(theme: &Theme) -> Color {
    let p = theme.palette();
    Color {
        a: 0.05,
        ..p.text
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(target_os = "windows")]
    {
        // AppsUseLightTheme is 0x0 when apps use the dark theme
        std::process::Command::new("reg")
            .args([
                "query",
                r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
                "/v",
                "AppsUseLightTheme",
            ])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("0x0"))
            .unwrap_or(true)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        true
    }
}

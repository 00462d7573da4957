use iced::theme::Palette;
use iced::{color, Color, Theme};

use crate::settings::Appearance;

pub fn resolve_theme(appearance: Appearance) -> Theme {
    let palette = match appearance {
        Appearance::Dark => dark_palette(),
        Appearance::Light => light_palette(),
        Appearance::System if system_prefers_dark() => dark_palette(),
        Appearance::System => light_palette(),
    };
    Theme::custom("FaceCam", palette)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x1c, 0x1c, 0x1e),
        text: color!(0xcc, 0xcc, 0xcc),
        primary: color!(0x5e, 0x9f, 0xf5),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf5, 0xf5, 0xf7),
        text: color!(0x1d, 0x1d, 0x1f),
        primary: color!(0x34, 0x78, 0xf6),
        success: color!(0x34, 0xc7, 0x59),
        warning: color!(0xff, 0x9f, 0x0a),
        danger: color!(0xff, 0x3b, 0x30),
    }
}

/// Background one step away from the window background.
pub fn surface_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    let shift = if is_light(bg) { -0.05 } else { 0.08 };
    Color {
        r: (bg.r + shift).clamp(0.0, 1.0),
        g: (bg.g + shift).clamp(0.0, 1.0),
        b: (bg.b + shift).clamp(0.0, 1.0),
        a: 1.0,
    }
}

pub fn muted_text_color(theme: &Theme) -> Color {
    Color {
        a: 0.6,
        ..theme.palette().text
    }
}

fn is_light(c: Color) -> bool {
    c.r * 0.299 + c.g * 0.587 + c.b * 0.114 > 0.5
}

fn system_prefers_dark() -> bool {
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
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_differs_from_background() {
        for appearance in [Appearance::Dark, Appearance::Light] {
            let theme = resolve_theme(appearance);
            assert_ne!(surface_color(&theme), theme.palette().background);
        }
    }

    #[test]
    fn test_light_palette_is_light() {
        assert!(is_light(light_palette().background));
        assert!(!is_light(dark_palette().background));
    }
}

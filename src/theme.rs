// ============================================================================
// THEME - accent colors, passed explicitly to every draw function
// ============================================================================

use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use ratatui::style::Color;
use regex::Regex;

// Amount each channel is darkened by to derive the "active" accent.
const ACTIVE_DARKEN: u8 = 32;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub main: String,
    pub hover: String,
}

impl Palette {
    fn new(main: &str, hover: &str) -> Self {
        Self {
            main: main.to_string(),
            hover: hover.to_string(),
        }
    }
}

pub fn builtin_palette(name: &str) -> Option<Palette> {
    match name {
        "default" => Some(Palette::new("#91bdf1", "#619ee8")),
        "group" => Some(Palette::new("#ffd966", "#ffc933")),
        "rose" => Some(Palette::new("#f4a8a8", "#f19191")),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub main: Color,
    pub hover: Color,
    pub active: Color,
    pub income: Color,
    pub expense: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // builtin palettes are valid hex, so this cannot fail
        builtin_palette("default")
            .and_then(|p| Theme::from_palette(&p).ok())
            .unwrap_or(Theme {
                main: Color::Cyan,
                hover: Color::LightCyan,
                active: Color::Blue,
                income: Color::Green,
                expense: Color::Red,
                muted: Color::DarkGray,
            })
    }
}

impl Theme {
    pub fn from_palette(palette: &Palette) -> Result<Self> {
        let main = parse_hex(&palette.main)?;
        let hover = parse_hex(&palette.hover)?;
        let active = darken(main, ACTIVE_DARKEN);
        Ok(Self {
            main: to_color(main),
            hover: to_color(hover),
            active: to_color(active),
            income: Color::Rgb(0x31, 0x82, 0xf6),
            expense: Color::Rgb(0xf0, 0x44, 0x52),
            muted: Color::Gray,
        })
    }
}

fn hex_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^#?([0-9a-fA-F]{6})$").ok())
        .as_ref()
}

pub fn parse_hex(value: &str) -> Result<(u8, u8, u8)> {
    let caps = hex_pattern()
        .and_then(|re| re.captures(value.trim()))
        .ok_or_else(|| anyhow!("invalid color '{value}', expected #rrggbb"))?;
    let hex = &caps[1];
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

pub fn darken((r, g, b): (u8, u8, u8), amount: u8) -> (u8, u8, u8) {
    (
        r.saturating_sub(amount),
        g.saturating_sub(amount),
        b.saturating_sub(amount),
    )
}

fn to_color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_or_without_hash() {
        assert_eq!(parse_hex("#f4a8a8").unwrap(), (0xf4, 0xa8, 0xa8));
        assert_eq!(parse_hex("91BDF1").unwrap(), (0x91, 0xbd, 0xf1));
        assert!(parse_hex("#fff").is_err());
        assert!(parse_hex("#gggggg").is_err());
    }

    #[test]
    fn darken_saturates_at_zero() {
        assert_eq!(darken((0xf4, 0xa8, 0x10), 32), (0xd4, 0x88, 0x00));
    }

    #[test]
    fn active_color_is_darkened_main() {
        let theme = Theme::from_palette(&builtin_palette("rose").unwrap()).unwrap();
        assert_eq!(theme.main, Color::Rgb(0xf4, 0xa8, 0xa8));
        assert_eq!(theme.active, Color::Rgb(0xd4, 0x88, 0x88));
    }
}

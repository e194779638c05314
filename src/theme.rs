use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from config. Later calls are ignored.
pub fn init(config: &ThemeConfig) {
    let _ = THEME.set(Theme::from_config(config));
}

/// Get the active theme.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Gray);
pub const STATUS_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
pub const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
pub const ERROR_STYLE: Style = Style::new().fg(Color::LightRed).add_modifier(Modifier::BOLD);

/// iOS system blue.
const DEFAULT_ACCENT: Color = Color::Rgb(0, 122, 255);

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub title: Style,
    pub focused_border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_accent(DEFAULT_ACCENT)
    }
}

impl Theme {
    pub fn with_accent(accent: Color) -> Self {
        Self {
            accent,
            title: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            focused_border: Style::default().fg(accent),
        }
    }

    pub fn from_config(config: &ThemeConfig) -> Self {
        config
            .accent
            .as_deref()
            .and_then(parse_color)
            .map(Self::with_accent)
            .unwrap_or_default()
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}

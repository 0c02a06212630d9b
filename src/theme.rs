use std::path::PathBuf;
use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tracing::warn;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Get the active theme (loaded once on first call).
pub fn current() -> &'static Theme {
    THEME.get_or_init(|| Theme::load().unwrap_or_default())
}

// Const fallbacks used in places that need compile-time styles
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const MARKER_FALLBACK: Color = Color::Green;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    /// Days of the neighbouring months.
    pub out_of_bounds: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            out_of_bounds: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str::<ThemeConfig>(&content) {
            Ok(config) => Some(config.into_theme()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed theme file");
                None
            }
        }
    }

    /// Built-in preset by name; unknown names give the default theme.
    pub fn preset(name: &str) -> Self {
        match name {
            "bloom" => Self::bloom(),
            _ => Self::default(),
        }
    }

    /// Built from the routine-type palette.
    fn bloom() -> Self {
        let amber = Color::Rgb(0xf5, 0x9e, 0x0b);
        let indigo = Color::Rgb(0x63, 0x66, 0xf1);
        let emerald = Color::Rgb(0x10, 0xb9, 0x81);
        let pink = Color::Rgb(0xec, 0x48, 0x99);
        let slate = Color::Rgb(0x33, 0x41, 0x55);
        Self {
            name: "bloom".to_string(),
            today: Style::default().fg(Color::Black).bg(amber),
            selected: Style::default().fg(Color::White).bg(indigo),
            header: Style::default().fg(pink).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(0x94, 0xa3, 0xb8)),
            out_of_bounds: Style::default().fg(Color::Rgb(0x64, 0x74, 0x8b)),
            border: Style::default().fg(emerald),
            status: Style::default().fg(Color::White).bg(slate),
            highlight: Style::default().bg(slate).add_modifier(Modifier::BOLD),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("theme.toml"))
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct ThemeConfig {
    preset: Option<String>,
    today_fg: Option<String>,
    today_bg: Option<String>,
    selected_fg: Option<String>,
    selected_bg: Option<String>,
    header_fg: Option<String>,
    dim_fg: Option<String>,
    out_of_bounds_fg: Option<String>,
    border_fg: Option<String>,
    status_fg: Option<String>,
    status_bg: Option<String>,
    highlight_bg: Option<String>,
}

impl ThemeConfig {
    fn into_theme(self) -> Theme {
        // Start from preset or default
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        override_style(&mut theme.today, self.today_fg, self.today_bg);
        override_style(&mut theme.selected, self.selected_fg, self.selected_bg);
        override_style(&mut theme.header, self.header_fg, None);
        override_style(&mut theme.dim, self.dim_fg, None);
        override_style(&mut theme.out_of_bounds, self.out_of_bounds_fg, None);
        override_style(&mut theme.border, self.border_fg, None);
        override_style(&mut theme.status, self.status_fg, self.status_bg);
        override_style(&mut theme.highlight, None, self.highlight_bg);

        theme
    }
}

fn override_style(style: &mut Style, fg: Option<String>, bg: Option<String>) {
    if let Some(c) = fg.as_deref().and_then(parse_color) {
        *style = style.fg(c);
    }
    if let Some(c) = bg.as_deref().and_then(parse_color) {
        *style = style.bg(c);
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#').filter(|h| h.len() == 6) {
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
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

/// Colour for a feature status, falling back when the value is unparseable.
pub fn status_color(color: &str) -> Color {
    parse_color(color).unwrap_or(MARKER_FALLBACK)
}

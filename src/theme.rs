use anyhow::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

/// A theme given to [`Picker::set_theme`](crate::Picker::set_theme):
/// either the name of a built-in palette, or a key→color map overlaid on
/// the current base palette. Keys that match no palette field are kept
/// but have no visual effect.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThemeSpec {
    Named(String),
    Custom(BTreeMap<String, String>),
}

/// Color palette for one picker. All values are `#rrggbb` hex strings;
/// the TUI adapter turns them into terminal colors on draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Backgrounds
    pub bg: String, pub bg_muted: String,
    // Borders
    pub border: String, pub border_active: String,
    // Text
    pub text: String, pub text_muted: String, pub accent: String,
    // Active-cell highlight
    pub active_bg: String, pub active_fg: String,
    // Special
    pub weekend_fg: String,
}

impl Theme {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg_color(&self)            -> Color { hex_to_color(&self.bg) }
    pub fn bg_muted_color(&self)      -> Color { hex_to_color(&self.bg_muted) }
    pub fn border_color(&self)        -> Color { hex_to_color(&self.border) }
    pub fn border_active_color(&self) -> Color { hex_to_color(&self.border_active) }
    pub fn text_color(&self)          -> Color { hex_to_color(&self.text) }
    pub fn text_muted_color(&self)    -> Color { hex_to_color(&self.text_muted) }
    pub fn accent_color(&self)        -> Color { hex_to_color(&self.accent) }
    pub fn weekend_color(&self)       -> Color { hex_to_color(&self.weekend_fg) }

    pub fn active_highlight(&self) -> (Color, Color) {
        (hex_to_color(&self.active_bg), hex_to_color(&self.active_fg))
    }

    /// Overrides one palette field by name. Returns false for keys that
    /// name no field (the override is then purely decorative).
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "bg"            => &mut self.bg,
            "bg_muted"      => &mut self.bg_muted,
            "border"        => &mut self.border,
            "border_active" => &mut self.border_active,
            "text"          => &mut self.text,
            "text_muted"    => &mut self.text_muted,
            "accent"        => &mut self.accent,
            "active_bg"     => &mut self.active_bg,
            "active_fg"     => &mut self.active_fg,
            "weekend_fg"    => &mut self.weekend_fg,
            _ => return false,
        };
        *slot = value.to_owned();
        true
    }

    // ── Persistence ───────────────────────────────────────────────────────────
    pub fn load() -> Result<Self> {
        let path = config_dir().join("theme.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            Ok(Theme::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────
    pub fn all() -> Vec<Theme> {
        vec![Theme::dark(), Theme::light(), Theme::nord(), Theme::gruvbox()]
    }

    /// Built-in palette by name, if there is one.
    pub fn named(name: &str) -> Option<Theme> {
        Theme::all().into_iter().find(|t| t.name == name)
    }

    // ── Built-in themes ───────────────────────────────────────────────────────

    pub fn dark() -> Self { Self {
        name: "dark".into(),
        bg: "#1e1e2e".into(), bg_muted: "#181825".into(),
        border: "#45475a".into(), border_active: "#89b4fa".into(),
        text: "#cdd6f4".into(), text_muted: "#6c7086".into(), accent: "#89b4fa".into(),
        active_bg: "#89b4fa".into(), active_fg: "#1e1e2e".into(),
        weekend_fg: "#f38ba8".into(),
    }}

    pub fn light() -> Self { Self {
        name: "light".into(),
        bg: "#eff1f5".into(), bg_muted: "#e6e9ef".into(),
        border: "#bcc0cc".into(), border_active: "#1e66f5".into(),
        text: "#4c4f69".into(), text_muted: "#9ca0b0".into(), accent: "#1e66f5".into(),
        active_bg: "#1e66f5".into(), active_fg: "#eff1f5".into(),
        weekend_fg: "#d20f39".into(),
    }}

    pub fn nord() -> Self { Self {
        name: "nord".into(),
        bg: "#2e3440".into(), bg_muted: "#3b4252".into(),
        border: "#4c566a".into(), border_active: "#88c0d0".into(),
        text: "#eceff4".into(), text_muted: "#4c566a".into(), accent: "#88c0d0".into(),
        active_bg: "#81a1c1".into(), active_fg: "#2e3440".into(),
        weekend_fg: "#bf616a".into(),
    }}

    pub fn gruvbox() -> Self { Self {
        name: "gruvbox".into(),
        bg: "#282828".into(), bg_muted: "#1d2021".into(),
        border: "#504945".into(), border_active: "#d79921".into(),
        text: "#ebdbb2".into(), text_muted: "#7c6f64".into(), accent: "#d79921".into(),
        active_bg: "#689d6a".into(), active_fg: "#282828".into(),
        weekend_fg: "#fb4934".into(),
    }}
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("daypick")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_lookup_covers_the_catalogue() {
        for theme in Theme::all() {
            assert_eq!(Theme::named(&theme.name), Some(theme.clone()));
        }
        assert_eq!(Theme::named("solarized"), None);
    }

    #[test]
    fn default_is_dark() {
        assert_eq!(Theme::default().name, "dark");
    }

    #[test]
    fn set_overrides_known_fields_only() {
        let mut theme = Theme::dark();
        assert!(theme.set("bg", "#ff0000"));
        assert_eq!(theme.bg, "#ff0000");
        assert!(!theme.set("sparkle", "#00ff00"));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(hex_to_color("ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(hex_to_color("#fff"), Color::Reset);
    }
}

//! Style configuration for rendering
//!
//! Supplied by the host theme. The parser never looks at it; the renderer
//! copies the relevant values into the attributes of each run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An RGB color, written as `#rrggbb` in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| format!("expected a #rrggbb color, got {s:?}"))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color {s:?}: {e}"))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Visual settings for every element kind.
///
/// Sizes are in host units (density-independent pixels on a graphical host,
/// cells on a terminal). Every field has a default, so a configuration file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    // Palette
    /// Links
    pub color_primary: Color,
    /// Bullets and quote bars
    pub color_secondary: Color,
    /// Headers
    pub color_on_surface: Color,
    /// Code backgrounds
    pub color_surface: Color,
    /// Horizontal rules
    pub color_divider: Color,

    // Emphasis
    pub bold_weight: u16,
    /// Slant in degrees
    pub italic_slant: f32,
    pub strike_width: f32,

    // Headers, scale relative to body text for levels 1..=6
    pub header_sizes: [f32; 6],
    pub header_margin_top: f32,
    pub header_margin_bottom: f32,

    // Quotes and lists
    pub gap: f32,
    pub quote_width: f32,
    pub bullet_glyph: String,
    pub list_indent: f32,

    pub rule_width: f32,

    // Code
    pub code_corner_radius: f32,
    pub code_monospace: bool,

    // Links
    pub link_underline: bool,
    /// Glyph shown in front of every link
    pub link_icon: Option<String>,

    // Images
    pub image_width: f32,
    pub image_height: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_primary: Color::rgb(0x62, 0x00, 0xee),
            color_secondary: Color::rgb(0x03, 0xda, 0xc5),
            color_on_surface: Color::rgb(0x00, 0x00, 0x00),
            color_surface: Color::rgb(0xf2, 0xf2, 0xf2),
            color_divider: Color::rgb(0xe0, 0xe0, 0xe0),
            bold_weight: 700,
            italic_slant: 12.0,
            strike_width: 4.0,
            header_sizes: [2.0, 1.5, 1.25, 1.0, 0.875, 0.85],
            header_margin_top: 12.0,
            header_margin_bottom: 8.0,
            gap: 8.0,
            quote_width: 4.0,
            bullet_glyph: "\u{2022}".to_string(),
            list_indent: 8.0,
            rule_width: 2.0,
            code_corner_radius: 8.0,
            code_monospace: true,
            link_underline: true,
            link_icon: None,
            image_width: 320.0,
            image_height: 180.0,
        }
    }
}

impl StyleConfig {
    /// Size scale for a header level, clamped to the configured levels
    pub fn header_size(&self, level: u8) -> f32 {
        let idx = usize::from(level.clamp(1, 6)) - 1;
        self.header_sizes[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_round_trip() {
        let color: Color = "#1a2B3c".parse().unwrap();
        assert_eq!(color, Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_string(), "#1a2b3c");
    }

    #[test]
    fn test_color_rejects_malformed() {
        assert!("1a2b3c".parse::<Color>().is_err());
        assert!("#1a2b".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_header_size_by_level() {
        let config = StyleConfig::default();
        assert_eq!(config.header_size(1), 2.0);
        assert_eq!(config.header_size(6), 0.85);
        assert_eq!(config.header_size(9), 0.85);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: StyleConfig = toml::from_str(
            r##"
            bullet_glyph = "-"
            color_primary = "#ff0000"
            "##,
        )
        .unwrap();
        assert_eq!(config.bullet_glyph, "-");
        assert_eq!(config.color_primary, Color::rgb(255, 0, 0));
        assert_eq!(config.rule_width, StyleConfig::default().rule_width);
    }
}

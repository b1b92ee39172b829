//! Theme system for the terminal host
//!
//! A theme pairs terminal colors for plain text with the [`StyleConfig`]
//! handed to the renderer. Sizes in a theme's style are terminal cells.

use articlemark_core::markdown::Color as StyleColor;
use articlemark_core::StyleConfig;
use ratatui::style::Color;

pub mod base;
pub mod definitions;
mod registry;

use once_cell::sync::Lazy;
pub use registry::ThemeRegistry;

/// Global theme registry with all built-in themes
pub static THEME_REGISTRY: Lazy<ThemeRegistry> = Lazy::new(ThemeRegistry::new);

/// Theme used when the configuration names none or an unknown one
pub const DEFAULT_THEME: &str = "dark";

/// A complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub display_name: String,

    // Plain text
    pub text_color: Color,
    pub dim_color: Color,

    /// Style handed to the renderer
    pub style: StyleConfig,

    /// Style palette entries drawn with a terminal-native color instead
    pub native_colors: Vec<(StyleColor, Color)>,
}

impl Theme {
    /// Terminal color for a color carried by a rendered attribute
    pub fn paint(&self, color: StyleColor) -> Color {
        self.native_colors
            .iter()
            .find(|(rgb, _)| *rgb == color)
            .map_or(Color::Rgb(color.r, color.g, color.b), |(_, native)| *native)
    }

    /// Replace the renderer style, keeping native colors only for palette
    /// entries the new style leaves unchanged
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        let old = palette(&self.style);
        let new = palette(&style);
        self.native_colors.retain(|(rgb, _)| {
            old.iter()
                .zip(new.iter())
                .any(|(before, after)| before == rgb && after == rgb)
        });
        self.style = style;
        self
    }
}

fn palette(style: &StyleConfig) -> [StyleColor; 5] {
    [
        style.color_primary,
        style.color_secondary,
        style.color_on_surface,
        style.color_surface,
        style.color_divider,
    ]
}

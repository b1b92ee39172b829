//! Theme builder with terminal-sized defaults

use super::Theme;
use articlemark_core::markdown::Color as StyleColor;
use articlemark_core::StyleConfig;
use ratatui::style::Color;

/// Builder pattern for creating themes with sensible defaults
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    /// Create a new theme builder with terminal cell metrics
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            theme: Theme {
                name: name.into(),
                display_name: display_name.into(),
                // Reset means "unset" here, filled in by build()
                text_color: Color::Reset,
                dim_color: Color::Reset,
                style: cell_metrics(),
                native_colors: Vec::new(),
            },
        }
    }

    /// Set plain text colors
    pub fn text_colors(mut self, text: Color, dim: Color) -> Self {
        self.theme.text_color = text;
        self.theme.dim_color = dim;
        self
    }

    /// Set the renderer palette
    pub fn palette(
        mut self,
        primary: StyleColor,
        secondary: StyleColor,
        on_surface: StyleColor,
        surface: StyleColor,
        divider: StyleColor,
    ) -> Self {
        let style = &mut self.theme.style;
        style.color_primary = primary;
        style.color_secondary = secondary;
        style.color_on_surface = on_surface;
        style.color_surface = surface;
        style.color_divider = divider;
        self
    }

    /// Draw the palette with terminal-native colors, in palette order
    pub fn native_palette(
        mut self,
        primary: Color,
        secondary: Color,
        on_surface: Color,
        surface: Color,
        divider: Color,
    ) -> Self {
        let style = &self.theme.style;
        self.theme.native_colors = vec![
            (style.color_primary, primary),
            (style.color_secondary, secondary),
            (style.color_on_surface, on_surface),
            (style.color_surface, surface),
            (style.color_divider, divider),
        ];
        self
    }

    /// Adjust any other style value
    pub fn style(mut self, f: impl FnOnce(&mut StyleConfig)) -> Self {
        f(&mut self.theme.style);
        self
    }

    /// Build the theme with defaults for any unset colors
    pub fn build(mut self) -> Theme {
        if matches!(self.theme.text_color, Color::Reset) {
            let on_surface = self.theme.style.color_on_surface;
            self.theme.text_color = Color::Rgb(on_surface.r, on_surface.g, on_surface.b);
        }
        if matches!(self.theme.dim_color, Color::Reset) {
            // Derive a dimmer shade from the text color
            self.theme.dim_color = match self.theme.text_color {
                Color::Rgb(r, g, b) => Color::Rgb(r / 3 * 2, g / 3 * 2, b / 3 * 2),
                _ => Color::DarkGray,
            };
        }
        self.theme
    }
}

/// Renderer sizes expressed in terminal cells
fn cell_metrics() -> StyleConfig {
    StyleConfig {
        header_margin_top: 1.0,
        header_margin_bottom: 0.0,
        gap: 1.0,
        quote_width: 1.0,
        list_indent: 2.0,
        rule_width: 1.0,
        code_corner_radius: 0.0,
        image_width: 0.0,
        image_height: 1.0,
        ..StyleConfig::default()
    }
}

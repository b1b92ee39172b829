use super::super::base::ThemeBuilder;
use super::super::Theme;
use articlemark_core::markdown::Color as StyleColor;
use ratatui::style::Color;

/// Light theme for bright terminal backgrounds
pub fn light() -> Theme {
    ThemeBuilder::new("light", "Light")
        .text_colors(Color::Rgb(30, 30, 46), Color::Rgb(108, 111, 133))
        .palette(
            StyleColor::rgb(30, 102, 245),  // Blue links
            StyleColor::rgb(136, 57, 239),  // Mauve bullets and quote bars
            StyleColor::rgb(210, 15, 57),   // Red headers
            StyleColor::rgb(230, 233, 239), // Code background
            StyleColor::rgb(172, 176, 190), // Rules
        )
        .style(|style| style.bullet_glyph = "-".to_string())
        .build()
}

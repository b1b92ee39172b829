use super::super::base::ThemeBuilder;
use super::super::Theme;
use articlemark_core::markdown::Color as StyleColor;
use ratatui::style::Color;

/// Default dark theme
pub fn dark() -> Theme {
    ThemeBuilder::new("dark", "Dark")
        .text_colors(
            Color::Rgb(203, 213, 225), // Light gray text
            Color::Rgb(148, 163, 184), // Dimmed text
        )
        .palette(
            StyleColor::rgb(139, 233, 253), // Cyan links
            StyleColor::rgb(189, 147, 249), // Purple bullets and quote bars
            StyleColor::rgb(255, 140, 90),  // Rust orange headers
            StyleColor::rgb(30, 30, 45),    // Code background
            StyleColor::rgb(88, 91, 112),   // Muted purple-gray rules
        )
        .build()
}

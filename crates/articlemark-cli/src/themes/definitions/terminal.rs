use super::super::base::ThemeBuilder;
use super::super::Theme;
use articlemark_core::markdown::Color as StyleColor;
use ratatui::style::Color;

/// Terminal theme - uses native terminal colors (ANSI 0-15)
///
/// The palette below only names the slots; every one of them is drawn with
/// the terminal's own colorscheme.
pub fn terminal() -> Theme {
    let white = Color::Indexed(7);
    let bright_black = Color::Indexed(8); // Gray
    let bright_blue = Color::Indexed(12);
    let bright_magenta = Color::Indexed(13);
    let bright_cyan = Color::Indexed(14);

    // Reset = terminal's default background
    let bg = Color::Reset;

    ThemeBuilder::new("terminal", "Terminal")
        .text_colors(white, bright_black)
        .palette(
            StyleColor::rgb(0x55, 0x55, 0xff),
            StyleColor::rgb(0xff, 0x55, 0xff),
            StyleColor::rgb(0x55, 0xff, 0xff),
            StyleColor::rgb(0x00, 0x00, 0x00),
            StyleColor::rgb(0x80, 0x80, 0x80),
        )
        .native_palette(bright_blue, bright_magenta, bright_cyan, bg, bright_black)
        .build()
}

//! Attribute to terminal style mapping

use articlemark_core::markdown::{Attribute, StyledRun};
use ratatui::style::{Modifier, Style};

use crate::themes::Theme;

/// Lowest weight still drawn bold
const BOLD_THRESHOLD: u16 = 600;

/// Terminal style for a run, composing every attribute it carries
pub fn run_style(run: &StyledRun, theme: &Theme) -> Style {
    run.attributes
        .iter()
        .fold(Style::default().fg(theme.text_color), |style, attribute| {
            apply(style, attribute, theme)
        })
}

fn apply(style: Style, attribute: &Attribute, theme: &Theme) -> Style {
    match attribute {
        Attribute::Bold { weight } if *weight >= BOLD_THRESHOLD => {
            style.add_modifier(Modifier::BOLD)
        }
        Attribute::Bold { .. } => style,
        Attribute::Italic { slant } if *slant != 0.0 => style.add_modifier(Modifier::ITALIC),
        Attribute::Italic { .. } => style,
        Attribute::Strike { thickness } if *thickness > 0.0 => {
            style.add_modifier(Modifier::CROSSED_OUT)
        }
        Attribute::Strike { .. } => style,
        Attribute::Header { scale, color, .. } => {
            // Terminals have one font size; large headers get underlined
            let style = style.fg(theme.paint(*color)).add_modifier(Modifier::BOLD);
            if *scale >= 1.5 {
                style.add_modifier(Modifier::UNDERLINED)
            } else {
                style
            }
        }
        Attribute::ListMarker { color } => style.fg(theme.paint(*color)),
        Attribute::Rule { color, .. } => style.fg(theme.paint(*color)),
        Attribute::InlineCode { background, .. } | Attribute::BlockCode { background, .. } => {
            style.bg(theme.paint(*background))
        }
        Attribute::Link { color, underline } => {
            let style = style.fg(theme.paint(*color));
            if *underline {
                style.add_modifier(Modifier::UNDERLINED)
            } else {
                style
            }
        }
        Attribute::ImagePlaceholder { .. } => style.fg(theme.dim_color).add_modifier(Modifier::ITALIC),
        // Drawn per line
        Attribute::Quote { .. } | Attribute::ListItem { .. } => style,
    }
}

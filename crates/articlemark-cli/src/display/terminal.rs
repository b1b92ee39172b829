//! Printing laid-out lines with crossterm

use std::io::Write;

use crossterm::style::{
    Attribute as TermAttribute, Color as TermColor, Print, ResetColor, SetAttribute,
    SetBackgroundColor, SetForegroundColor,
};
use crossterm::queue;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

use super::hyperlinks::{self, LinkSpan};
use super::lines::RenderedArticle;
use super::wrap::display_width;

/// Print styled lines, wrapping links in OSC 8 when `hyperlinks` is set
pub fn print_article(
    out: &mut impl Write,
    article: &RenderedArticle,
    hyperlinks: bool,
) -> std::io::Result<()> {
    for (index, line) in article.lines.iter().enumerate() {
        let links: Vec<&LinkSpan> = if hyperlinks {
            article.links.iter().filter(|link| link.line == index).collect()
        } else {
            Vec::new()
        };
        print_line(out, line, &links)?;
    }
    out.flush()
}

/// Print one line followed by a newline
pub fn print_line(out: &mut impl Write, line: &Line<'_>, links: &[&LinkSpan]) -> std::io::Result<()> {
    let mut col = 0;
    for span in &line.spans {
        let width = display_width(&span.content);
        if let Some(link) = links.iter().find(|link| link.start_col == col) {
            queue!(out, Print(hyperlinks::open(&link.url)))?;
        }

        apply_style(out, span.style)?;
        queue!(out, Print(&span.content))?;
        queue!(out, SetAttribute(TermAttribute::Reset), ResetColor)?;

        col += width;
        if links.iter().any(|link| link.end_col == col) {
            queue!(out, Print(hyperlinks::CLOSE))?;
        }
    }
    queue!(out, Print("\n"))
}

fn apply_style(out: &mut impl Write, style: Style) -> std::io::Result<()> {
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(to_crossterm(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(to_crossterm(bg)))?;
    }
    let modifiers = [
        (Modifier::BOLD, TermAttribute::Bold),
        (Modifier::DIM, TermAttribute::Dim),
        (Modifier::ITALIC, TermAttribute::Italic),
        (Modifier::UNDERLINED, TermAttribute::Underlined),
        (Modifier::REVERSED, TermAttribute::Reverse),
        (Modifier::CROSSED_OUT, TermAttribute::CrossedOut),
    ];
    for (modifier, attribute) in modifiers {
        if style.add_modifier.contains(modifier) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

/// Map a ratatui color to the crossterm color with the same meaning
pub fn to_crossterm(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Span;

    fn printed(article: &RenderedArticle, hyperlinks: bool) -> String {
        let mut buf = Vec::new();
        print_article(&mut buf, article, hyperlinks).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn linked_article() -> RenderedArticle {
        RenderedArticle {
            lines: vec![Line::from(vec![
                Span::raw("go "),
                Span::raw("home"),
            ])],
            links: vec![LinkSpan {
                url: "http://h".to_string(),
                line: 0,
                start_col: 3,
                end_col: 7,
            }],
        }
    }

    #[test]
    fn test_hyperlink_wraps_link_cells() {
        let out = printed(&linked_article(), true);
        let open = out.find("\x1b]8;;http://h\x1b\\").unwrap();
        let text = out.find("home").unwrap();
        let close = out.rfind(hyperlinks::CLOSE).unwrap();
        assert!(out.find("go ").unwrap() < open);
        assert!(open < text && text < close);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_no_hyperlinks_when_disabled() {
        let out = printed(&linked_article(), false);
        assert!(!out.contains("\x1b]8;;"));
        assert!(out.contains("home"));
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_crossterm(Color::Indexed(12)), TermColor::AnsiValue(12));
        assert_eq!(
            to_crossterm(Color::Rgb(1, 2, 3)),
            TermColor::Rgb { r: 1, g: 2, b: 3 }
        );
        assert_eq!(to_crossterm(Color::LightRed), TermColor::Red);
    }
}

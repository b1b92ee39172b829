//! Styled runs to terminal lines
//!
//! Runs are split at line breaks into logical lines. Block attributes found
//! on a logical line (quote, list item, header, rule, code block) decide its
//! prefix and spacing; the rest is wrapped to the available width.

use articlemark_core::markdown::{Attribute, Color as StyleColor, StyledRun, StyledText, Target};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::hyperlinks::{collect_links, LinkSpan};
use super::style::run_style;
use super::wrap::{hard_wrap, pieces_width, wrap_pieces, Piece};
use crate::themes::Theme;

/// Narrowest content column, however deep the prefix
const MIN_CONTENT_WIDTH: usize = 10;

/// Rendered article with link tracking
#[derive(Debug, Clone, Default)]
pub struct RenderedArticle {
    /// The rendered lines of text
    pub lines: Vec<Line<'static>>,
    /// All hyperlinks with their positions
    pub links: Vec<LinkSpan>,
}

/// One source line worth of run segments
#[derive(Default)]
struct Logical<'r> {
    segments: Vec<(&'r StyledRun, &'r str)>,
}

/// Block layout of a logical line
#[derive(Default)]
struct Block {
    quote: Option<(usize, usize, StyleColor)>,
    list_indent: Option<usize>,
    header_margins: Option<(usize, usize)>,
    rule: Option<(f32, StyleColor)>,
    /// Code block background
    code: Option<StyleColor>,
}

impl Block {
    fn of(line: &Logical<'_>) -> Self {
        let mut block = Self::default();
        for attribute in line.segments.iter().flat_map(|(run, _)| &run.attributes) {
            match attribute {
                Attribute::Quote {
                    indent,
                    bar_width,
                    bar_color,
                } => block.quote = Some((cells(*indent), cells(*bar_width).max(1), *bar_color)),
                Attribute::ListItem { indent } => block.list_indent = Some(cells(*indent)),
                Attribute::Header {
                    margin_top,
                    margin_bottom,
                    ..
                } => block.header_margins = Some((cells(*margin_top), cells(*margin_bottom))),
                Attribute::Rule { thickness, color } => block.rule = Some((*thickness, *color)),
                Attribute::BlockCode { background, .. } => block.code = Some(*background),
                _ => {}
            }
        }
        block
    }

    fn prefix(&self, theme: &Theme) -> Vec<Piece> {
        let mut prefix = Vec::new();
        if let Some((indent, bar_width, color)) = self.quote {
            let bar = Style::default().fg(theme.paint(color));
            prefix.push(Piece::new("\u{2502}".repeat(bar_width), bar));
            prefix.push(Piece::new(" ".repeat(indent), Style::default()));
        }
        if let Some(indent) = self.list_indent {
            prefix.push(Piece::new(" ".repeat(indent), Style::default()));
        }
        prefix.retain(|piece| !piece.text.is_empty());
        prefix
    }
}

/// Host size units to terminal cells
fn cells(value: f32) -> usize {
    value.max(0.0).round() as usize
}

/// Lay out rendered text for a terminal `width` cells wide
pub fn layout(styled: &StyledText, theme: &Theme, width: usize) -> RenderedArticle {
    let mut out = Output::default();
    if styled.is_empty() {
        return out.article;
    }
    for line in split_lines(&styled.runs) {
        out.push_logical(&line, theme, width);
    }
    tracing::debug!(
        lines = out.article.lines.len(),
        links = out.article.links.len(),
        "Laid out article"
    );
    out.article
}

fn split_lines(runs: &[StyledRun]) -> Vec<Logical<'_>> {
    let mut lines = vec![Logical::default()];
    for run in runs {
        let mut segments = run.text.split('\n').peekable();
        let mut first = true;
        while let Some(segment) = segments.next() {
            if !first {
                lines.push(Logical::default());
            }
            let trailing = segments.peek().is_none() && !first;
            if let Some(line) = lines.last_mut() {
                // The empty tail after a final break belongs to the next line
                if !(trailing && segment.is_empty()) {
                    line.segments.push((run, segment));
                }
            }
            first = false;
        }
    }
    // A final line break does not open another line
    if lines.len() > 1 && lines.last().is_some_and(|line| line.segments.is_empty()) {
        lines.pop();
    }
    lines
}

#[derive(Default)]
struct Output {
    article: RenderedArticle,
}

impl Output {
    fn push_logical(&mut self, line: &Logical<'_>, theme: &Theme, width: usize) {
        let block = Block::of(line);
        let prefix = block.prefix(theme);
        let available = width
            .saturating_sub(pieces_width(&prefix))
            .max(MIN_CONTENT_WIDTH);

        if let Some((thickness, color)) = block.rule {
            let glyph = if thickness >= 2.0 { "\u{2501}" } else { "\u{2500}" };
            let rule = Piece::new(glyph.repeat(available), Style::default().fg(theme.paint(color)));
            self.push_line(&prefix, vec![rule]);
            return;
        }

        if let Some((top, _)) = block.header_margins {
            if !self.article.lines.is_empty() {
                self.push_blank(top);
            }
        }

        let (marker, body) = content(line, theme);
        if let Some(background) = block.code {
            let background = Style::default().bg(theme.paint(background));
            for mut row in hard_wrap(&body, available) {
                let pad = available.saturating_sub(pieces_width(&row));
                row.push(Piece::new(" ".repeat(pad), background));
                self.push_line(&prefix, row);
            }
        } else {
            let hang = pieces_width(&marker);
            let rows = wrap_pieces(&body, available.saturating_sub(hang).max(1));
            for (idx, row) in rows.into_iter().enumerate() {
                let mut pieces = if idx == 0 {
                    marker.clone()
                } else {
                    vec![Piece::new(" ".repeat(hang), Style::default())]
                };
                pieces.extend(row);
                self.push_line(&prefix, pieces);
            }
        }

        if let Some((_, bottom)) = block.header_margins {
            self.push_blank(bottom);
        }
    }

    fn push_line(&mut self, prefix: &[Piece], content: Vec<Piece>) {
        let mut pieces = prefix.to_vec();
        pieces.extend(content.into_iter().filter(|piece| !piece.text.is_empty()));

        let index = self.article.lines.len();
        self.article.links.extend(collect_links(&pieces, index));
        let spans: Vec<Span<'static>> = pieces
            .into_iter()
            .map(|piece| Span::styled(piece.text, piece.style))
            .collect();
        self.article.lines.push(Line::from(spans));
    }

    fn push_blank(&mut self, count: usize) {
        for _ in 0..count {
            self.article.lines.push(Line::default());
        }
    }
}

/// List marker pieces and body pieces of a logical line
fn content(line: &Logical<'_>, theme: &Theme) -> (Vec<Piece>, Vec<Piece>) {
    let mut marker = Vec::new();
    let mut body = Vec::new();
    for (run, segment) in &line.segments {
        let style = run_style(run, theme);
        let mut piece = match &run.target {
            Some(Target::Image { url, alt, title }) => {
                let label = title.as_deref().or(alt.as_deref()).unwrap_or(url);
                Piece::new(format!("[image: {label}]"), style)
            }
            _ => Piece::new(*segment, style),
        };
        if let Some(Target::Link { url }) = &run.target {
            piece.link = Some(url.clone());
        }

        let is_marker = run.has(|a| matches!(a, Attribute::ListMarker { .. }));
        if is_marker && body.is_empty() {
            marker.push(piece);
        } else if !piece.text.is_empty() {
            body.push(piece);
        }
    }
    (marker, body)
}

/// Plain text of a laid-out line
#[cfg(test)]
pub(crate) fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

/// Highlight style for search hits
pub fn hit_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.paint(theme.style.color_primary))
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

/// Line of plain text with byte ranges highlighted
pub fn highlight(text: &str, hits: &[std::ops::Range<usize>], theme: &Theme) -> Line<'static> {
    let plain = Style::default().fg(theme.text_color);
    let mut spans = Vec::new();
    let mut cursor = 0;
    for hit in hits {
        let start = hit.start.max(cursor).min(text.len());
        let end = hit.end.min(text.len());
        if start >= end {
            continue;
        }
        if start > cursor {
            spans.push(Span::styled(text[cursor..start].to_string(), plain));
        }
        spans.push(Span::styled(text[start..end].to_string(), hit_style(theme)));
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), plain));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::THEME_REGISTRY;
    use articlemark_core::render_markdown;

    fn lay(source: &str, width: usize) -> RenderedArticle {
        let theme = THEME_REGISTRY.get("dark").unwrap();
        let styled = render_markdown(source, &theme.style).unwrap();
        layout(&styled, theme, width)
    }

    fn texts(article: &RenderedArticle) -> Vec<String> {
        article.lines.iter().map(line_text).collect()
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(texts(&lay("one\ntwo", 40)), vec!["one", "two"]);
    }

    #[test]
    fn test_list_items_indent_and_hang() {
        let article = lay("* alpha beta gamma", 12);
        assert_eq!(
            texts(&article),
            vec!["  \u{2022} alpha", "    beta", "    gamma"]
        );
    }

    #[test]
    fn test_quote_bar() {
        assert_eq!(texts(&lay("> wise words", 40)), vec!["\u{2502} wise words"]);
    }

    #[test]
    fn test_header_margins() {
        assert_eq!(
            texts(&lay("intro\n# Title\nbody", 40)),
            vec!["intro", "", "Title", "body"]
        );
        // No top margin on the first line
        assert_eq!(texts(&lay("# Title", 40)), vec!["Title"]);
    }

    #[test]
    fn test_rule_spans_width() {
        let article = lay("a\n---\nb", 20);
        assert_eq!(texts(&article)[1], "\u{2500}".repeat(20));
    }

    #[test]
    fn test_code_block_keeps_indentation() {
        let article = lay("```\n    indented\n```", 20);
        let lines = texts(&article);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("{:<20}", "    indented"));
    }

    #[test]
    fn test_code_block_closing_line_is_padded() {
        let article = lay("```
x
```
after", 10);
        let lines = texts(&article);
        assert_eq!(
            lines,
            vec![
                " ".repeat(10),
                format!("{:<10}", "x"),
                " ".repeat(10),
                "after".to_string(),
            ]
        );
        // the closing line keeps the block background
        let closing = &article.lines[2];
        assert!(closing.spans.iter().all(|span| span.style.bg.is_some()));
    }

    #[test]
    fn test_link_columns_after_wrap() {
        let article = lay("first words then [a link](http://x.io)", 12);
        assert_eq!(texts(&article), vec!["first words", "then a link"]);
        assert_eq!(article.links.len(), 1);
        let link = &article.links[0];
        assert_eq!(link.url, "http://x.io");
        assert_eq!((link.line, link.start_col, link.end_col), (1, 5, 11));
    }

    #[test]
    fn test_image_label() {
        let article = lay(r#"![cat](cat.png "A cat")"#, 40);
        assert_eq!(texts(&article), vec!["[image: A cat]"]);
    }

    #[test]
    fn test_highlight_hits() {
        let theme = THEME_REGISTRY.get("dark").unwrap();
        let line = highlight("find me here", &[5..7], theme);
        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["find ", "me", " here"]);
        assert_eq!(line.spans[1].style, hit_style(theme));
    }
}

//! Terminal display of rendered articles

mod hyperlinks;
mod lines;
mod style;
mod terminal;
mod wrap;

pub use lines::{highlight, layout, RenderedArticle};
pub use terminal::{print_article, print_line};

use articlemark_core::{render_markdown, GrammarError};

use crate::themes::Theme;

/// Render markdown source to terminal lines with link tracking
pub fn render_article(
    source: &str,
    theme: &Theme,
    width: usize,
) -> Result<RenderedArticle, GrammarError> {
    let styled = render_markdown(source, &theme.style)?;
    Ok(layout(&styled, theme, width))
}

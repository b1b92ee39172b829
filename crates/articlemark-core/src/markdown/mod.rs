//! Markdown parsing, rendering and plain-text extraction
//!
//! `parse` turns source text into an element tree borrowing from the source.
//! The tree then goes to `render` for display or `plain_text` for indexing.

mod elements;
mod error;
mod grammar;
mod parser;
mod plain;
mod renderer;
mod style;

pub use elements::{Element, Fence, MarkdownText};
pub use error::GrammarError;
pub use grammar::{Rule, GRAMMAR_RULES};
pub use parser::{parse, parse_optional, MAX_NESTING_DEPTH};
pub use plain::{clear, plain_text};
pub use renderer::{
    render, Attribute, LinkSpan, StyledRun, StyledText, Target, RULE_PLACEHOLDER,
};
pub use style::{Color, StyleConfig};

/// Parse and render markdown text in one step
pub fn render_markdown(source: &str, config: &StyleConfig) -> Result<StyledText, GrammarError> {
    let markdown = parse(source)?;
    Ok(render(&markdown, config))
}

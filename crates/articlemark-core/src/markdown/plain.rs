//! Plain-text extraction
//!
//! Flattens a parsed document back into the text a reader sees, with every
//! markdown marker removed. Used for search indexing.

use super::elements::{Element, MarkdownText};
use super::error::GrammarError;
use super::parser::parse;

/// Clear markdown text to a string without markdown characters.
///
/// Absent input stays absent.
pub fn clear(source: Option<&str>) -> Result<Option<String>, GrammarError> {
    let Some(source) = source else {
        return Ok(None);
    };
    let markdown = parse(source)?;
    Ok(Some(plain_text(&markdown)))
}

/// Flatten an already parsed document
pub fn plain_text(markdown: &MarkdownText<'_>) -> String {
    let mut out = String::new();
    for element in markdown {
        push_plain(element, &mut out);
    }
    out
}

fn push_plain(element: &Element<'_>, out: &mut String) {
    match element {
        Element::Text { text }
        | Element::InlineCode { text }
        | Element::BlockCode { text, .. }
        | Element::Link { text, .. } => out.push_str(text),
        Element::Rule { .. } => {}
        Element::Image { alt, .. } => {
            if let Some(alt) = alt {
                out.push_str(alt);
            }
        }
        Element::UnorderedListItem { children, .. }
        | Element::OrderedListItem { children, .. }
        | Element::Header { children, .. }
        | Element::Quote { children, .. }
        | Element::Italic { children, .. }
        | Element::Bold { children, .. }
        | Element::Strike { children, .. } => {
            for child in children {
                push_plain(child, out);
            }
        }
    }
}

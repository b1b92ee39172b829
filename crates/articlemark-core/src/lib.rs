//! articlemark core library
//!
//! Markdown for article bodies: a grammar-driven parser producing an element
//! tree, a renderer producing styled text runs for a host display, and a
//! plain-text extractor plus substring search for indexing.

pub mod markdown;
pub mod search;

pub use markdown::{
    clear, parse, render, render_markdown, Element, GrammarError, MarkdownText, StyleConfig,
    StyledText,
};
pub use search::{indexes_of, search, SearchResult};

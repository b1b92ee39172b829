//! Markdown element types
//!
//! Every element borrows its text from the source it was parsed from, so a
//! child's text is always a sub-slice of its parent's text.

use serde::Serialize;

/// Position of a line inside a fenced code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fence {
    /// First line of a multi-line block
    Start,
    /// Interior line of a multi-line block
    Middle,
    /// Last line of a multi-line block
    End,
    /// Block opened and closed on the same line
    Single,
}

/// A parsed markdown element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element<'a> {
    /// Literal text without markup
    Text { text: &'a str },
    /// `* item`, `+ item` or `- item`
    UnorderedListItem {
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    /// `1. item`; `order` keeps the numeral and the dot
    OrderedListItem {
        order: &'a str,
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    /// `# Title` through `###### Title`
    Header {
        level: u8,
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    /// `> quoted line`
    Quote {
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    Italic {
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    Bold {
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    Strike {
        text: &'a str,
        children: Vec<Element<'a>>,
    },
    /// Horizontal divider; `text` is the marker line and is never displayed
    Rule { text: &'a str },
    /// Literal code span, never parsed for nested markup
    InlineCode { text: &'a str },
    /// `[text](url)`
    Link { url: &'a str, text: &'a str },
    /// `![alt](url "title")`
    Image {
        url: &'a str,
        alt: Option<&'a str>,
        title: Option<&'a str>,
    },
    /// One line of a fenced code block
    BlockCode { fence: Fence, text: &'a str },
}

impl<'a> Element<'a> {
    /// Literal text owned by this element
    pub fn text(&self) -> &'a str {
        match self {
            Self::Text { text }
            | Self::UnorderedListItem { text, .. }
            | Self::OrderedListItem { text, .. }
            | Self::Header { text, .. }
            | Self::Quote { text, .. }
            | Self::Italic { text, .. }
            | Self::Bold { text, .. }
            | Self::Strike { text, .. }
            | Self::Rule { text }
            | Self::InlineCode { text }
            | Self::Link { text, .. }
            | Self::BlockCode { text, .. } => text,
            Self::Image { title, .. } => title.unwrap_or(""),
        }
    }

    /// Nested elements, empty for leaves
    pub fn children(&self) -> &[Element<'a>] {
        match self {
            Self::UnorderedListItem { children, .. }
            | Self::OrderedListItem { children, .. }
            | Self::Header { children, .. }
            | Self::Quote { children, .. }
            | Self::Italic { children, .. }
            | Self::Bold { children, .. }
            | Self::Strike { children, .. } => children,
            Self::Text { .. }
            | Self::Rule { .. }
            | Self::InlineCode { .. }
            | Self::Link { .. }
            | Self::Image { .. }
            | Self::BlockCode { .. } => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}

/// Result of parsing a markdown document: top-level elements in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkdownText<'a> {
    pub elements: Vec<Element<'a>>,
}

impl<'a> MarkdownText<'a> {
    pub fn new(elements: Vec<Element<'a>>) -> Self {
        Self { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element<'a>> {
        self.elements.iter()
    }
}

impl<'s, 'a> IntoIterator for &'s MarkdownText<'a> {
    type Item = &'s Element<'a>;
    type IntoIter = std::slice::Iter<'s, Element<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

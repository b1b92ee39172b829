//! Markdown grammar table
//!
//! Rules are compiled once into a single alternation. Each rule is one
//! capture group, in declaration order, so the leftmost match wins and a tie
//! at the same start goes to the rule declared first.

use std::fmt;

use fancy_regex::{Captures, Regex as FancyRegex, RegexBuilder};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{GrammarError, ScanError};

/// A grammar rule, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    UnorderedListItem,
    Header,
    Quote,
    Italic,
    Bold,
    Strike,
    HorizontalRule,
    InlineCode,
    Link,
    OrderedListItem,
    Image,
    BlockCode,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnorderedListItem => "unordered_list_item",
            Self::Header => "header",
            Self::Quote => "quote",
            Self::Italic => "italic",
            Self::Bold => "bold",
            Self::Strike => "strike",
            Self::HorizontalRule => "rule",
            Self::InlineCode => "inline_code",
            Self::Link => "link",
            Self::OrderedListItem => "ordered_list_item",
            Self::Image => "image",
            Self::BlockCode => "block_code",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grammar rules as (rule, pattern) pairs.
/// Order matters: it is the tie-break when two rules start at the same byte.
/// Patterns must only use non-capturing groups; the combined pattern relies
/// on group `n + 1` belonging to rule `n`.
/// Line ends are `\n` or `\r\n`; a trailing `\r` is never part of a match.
pub const GRAMMAR_RULES: &[(Rule, &str)] = &[
    (Rule::UnorderedListItem, r"^[*+-] [^\r\n]+(?=\r?$)"),
    (Rule::Header, r"^#{1,6} [^\r\n]+(?=\r?$)"),
    (Rule::Quote, r"^> [^\r\n]+(?=\r?$)"),
    // single marker, not touching a second marker (that would be bold)
    (
        Rule::Italic,
        r"(?<!\*)\*[^*\n].*?[^*\n]?\*(?!\*)|(?<!_)_[^_\n].*?[^_\n]?_(?!_)",
    ),
    (
        Rule::Bold,
        r"(?<!\*)\*{2}[^*\n].*?[^*\n]?\*{2}(?!\*)|(?<!_)_{2}[^_\n].*?[^_\n]?_{2}(?!_)",
    ),
    (Rule::Strike, r"(?<!~)~{2}[^~\n].*?[^~\n]?~{2}(?!~)"),
    (Rule::HorizontalRule, r"^(?:-{3}|_{3}|\*{3})(?=\r?$)"),
    // no whitespace directly inside the backticks
    (Rule::InlineCode, r"(?<!`)`[^`\s](?:[^`\n]*[^`\s])?`(?!`)"),
    (Rule::Link, r"\[[^\[\]\n]*\]\([^)\n]+\)"),
    (Rule::OrderedListItem, r"^\d+\. [^\r\n]+(?=\r?$)"),
    (Rule::Image, r"^!\[[^\[\]\n]*\]\([^\r\n]*\)(?=\r?$)"),
    (Rule::BlockCode, r"^```[\s\S]+?```(?=\r?$)"),
];

/// Backtracking budget of one scan window.
/// A window is a single line, or the lines of one fenced block.
const BACKTRACK_LIMIT: usize = 50_000_000;

/// Opening and closing marker of a fenced block
const FENCE: &str = "```";

/// Splits the text matched by [`Rule::Link`]
const LINK_PARTS: &str = r"^\[(?P<title>[^\[\]\n]*)\]\((?P<url>[^)\n]+)\)$";

/// Splits the text matched by [`Rule::Image`]
const IMAGE_PARTS: &str = r#"^!\[(?P<alt>[^\[\]\n]*)\]\((?P<url>.*?)(?: "(?P<title>.*)")?\)$"#;

/// Process-wide compiled grammar
static GRAMMAR: Lazy<Result<Grammar, GrammarError>> = Lazy::new(Grammar::compile);

/// Get the compiled grammar, compiling it on first use
pub fn grammar() -> Result<&'static Grammar, GrammarError> {
    GRAMMAR.as_ref().map_err(Clone::clone)
}

/// One grammar match inside a text span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    pub rule: Rule,
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

/// Parts of a `[title](url)` link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParts<'t> {
    pub title: &'t str,
    pub url: &'t str,
}

/// Parts of a `![alt](url "title")` image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParts<'t> {
    pub alt: Option<&'t str>,
    pub url: &'t str,
    pub title: Option<&'t str>,
}

/// Compiled grammar table
pub struct Grammar {
    elements: FancyRegex,
    link: Regex,
    image: Regex,
}

impl Grammar {
    fn compile() -> Result<Self, GrammarError> {
        let alternation = GRAMMAR_RULES
            .iter()
            .map(|(_, pattern)| format!("({pattern})"))
            .collect::<Vec<_>>()
            .join("|");

        let elements = RegexBuilder::new(&format!("(?m){alternation}"))
            .backtrack_limit(BACKTRACK_LIMIT)
            .build()
            .map_err(|e| GrammarError::Compile {
                pattern: "elements",
                message: e.to_string(),
            })?;
        let link = Regex::new(LINK_PARTS).map_err(|e| GrammarError::Compile {
            pattern: "link_parts",
            message: e.to_string(),
        })?;
        let image = Regex::new(IMAGE_PARTS).map_err(|e| GrammarError::Compile {
            pattern: "image_parts",
            message: e.to_string(),
        })?;

        tracing::debug!(rules = GRAMMAR_RULES.len(), "Compiled markdown grammar");
        Ok(Self {
            elements,
            link,
            image,
        })
    }

    /// Find the next match in `text` starting at byte `from`.
    ///
    /// Anchors and lookbehinds see the whole of `text`, so a match at `from`
    /// still knows whether it sits at a line start or after a marker.
    /// The search runs one line at a time; only a fenced block spans lines.
    pub(crate) fn next_match<'t>(
        &self,
        text: &'t str,
        from: usize,
    ) -> Result<Option<RuleMatch<'t>>, ScanError> {
        let mut line_start = from;
        while line_start < text.len() {
            let next_line = line_end(text, line_start);
            let window_end = fence_end(text, line_start).unwrap_or(next_line);
            if let Some(found) = self.match_in(text, window_end, line_start)? {
                return Ok(Some(found));
            }
            line_start = next_line;
        }
        Ok(None)
    }

    /// First match in `text[..window_end]` at or after `from`
    fn match_in<'t>(
        &self,
        text: &'t str,
        window_end: usize,
        from: usize,
    ) -> Result<Option<RuleMatch<'t>>, ScanError> {
        let window = &text[..window_end];
        let captures = match self.elements.captures_from_pos(window, from) {
            Ok(Some(captures)) => captures,
            Ok(None) => return Ok(None),
            Err(e) => {
                return Err(ScanError::Engine {
                    offset: from,
                    source: Box::new(e),
                })
            }
        };

        let (start, end) = captures
            .get(0)
            .map(|m| (m.start(), m.end()))
            .ok_or(GrammarError::UnknownRule { offset: from })?;
        let rule = rule_of(&captures).ok_or(GrammarError::UnknownRule { offset: start })?;
        if start == end {
            return Err(GrammarError::EmptyMatch {
                rule,
                offset: start,
            }
            .into());
        }

        Ok(Some(RuleMatch {
            rule,
            start,
            end,
            text: &text[start..end],
        }))
    }

    /// Split a matched link into title and url
    pub fn split_link<'t>(&self, matched: &'t str) -> Result<LinkParts<'t>, GrammarError> {
        let captures = self.link.captures(matched);
        let parts = captures.and_then(|c| {
            Some(LinkParts {
                title: c.name("title")?.as_str(),
                url: c.name("url")?.as_str(),
            })
        });
        parts.ok_or_else(|| GrammarError::Extraction {
            rule: Rule::Link,
            matched: matched.to_string(),
        })
    }

    /// Split a matched image into alt, url and optional title
    pub fn split_image<'t>(&self, matched: &'t str) -> Result<ImageParts<'t>, GrammarError> {
        let captures = self.image.captures(matched);
        let parts = captures.and_then(|c| {
            let alt = c.name("alt")?.as_str();
            Some(ImageParts {
                alt: (!alt.trim().is_empty()).then_some(alt),
                url: c.name("url")?.as_str(),
                title: c.name("title").map(|m| m.as_str()),
            })
        });
        parts.ok_or_else(|| GrammarError::Extraction {
            rule: Rule::Image,
            matched: matched.to_string(),
        })
    }
}

/// Byte after the line break of the line holding `at`, or the text end
pub(crate) fn line_end(text: &str, at: usize) -> usize {
    text[at..].find('\n').map_or(text.len(), |idx| at + idx + 1)
}

/// End of the line closing a fenced block opened at `line_start`.
///
/// Mirrors the lazy block rule: the block closes on the first line, the
/// opening one included, that ends in a fence at least one byte after the
/// opening fence.
fn fence_end(text: &str, line_start: usize) -> Option<usize> {
    let at_line_start = line_start == 0 || text[..line_start].ends_with('\n');
    if !at_line_start || !text[line_start..].starts_with(FENCE) {
        return None;
    }

    let earliest_close = line_start + 2 * FENCE.len() + 1;
    let mut start = line_start;
    while start < text.len() {
        let end = line_end(text, start);
        let line = &text[..end];
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        if content.len() >= earliest_close && content.ends_with(FENCE) {
            return Some(end);
        }
        start = end;
    }
    None
}

/// The rule owning the first participating capture group
fn rule_of(captures: &Captures<'_>) -> Option<Rule> {
    GRAMMAR_RULES
        .iter()
        .enumerate()
        .find(|(idx, _)| captures.get(idx + 1).is_some())
        .map(|(_, (rule, _))| *rule)
}

//! Link tracking for OSC 8 hyperlinks
//!
//! Link positions are collected while lines are laid out, then the printer
//! wraps the covered cells in OSC 8 sequences.

use super::wrap::Piece;

/// Tracks a hyperlink's position in rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// The URL this link points to
    pub url: String,
    /// Line index in rendered output (0-based)
    pub line: usize,
    /// Start column in display width units (0-based)
    pub start_col: usize,
    /// End column in display width units (exclusive)
    pub end_col: usize,
}

/// Link spans of one laid-out line; adjacent pieces with the same URL merge
pub fn collect_links(pieces: &[Piece], line: usize) -> Vec<LinkSpan> {
    let mut links: Vec<LinkSpan> = Vec::new();
    let mut col = 0;
    for piece in pieces {
        let width = piece.width();
        if let Some(url) = &piece.link {
            match links.last_mut() {
                Some(last) if last.end_col == col && &last.url == url => last.end_col += width,
                _ => links.push(LinkSpan {
                    url: url.clone(),
                    line,
                    start_col: col,
                    end_col: col + width,
                }),
            }
        }
        col += width;
    }
    links.retain(|link| link.end_col > link.start_col);
    links
}

/// Escape sequence opening a hyperlink
pub fn open(url: &str) -> String {
    format!("\x1b]8;;{}\x1b\\", sanitize(url))
}

/// Escape sequence closing the current hyperlink
pub const CLOSE: &str = "\x1b]8;;\x1b\\";

// Control characters would end the sequence early
fn sanitize(url: &str) -> String {
    url.chars().filter(|c| !c.is_control()).collect()
}

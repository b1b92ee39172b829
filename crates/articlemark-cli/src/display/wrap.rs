//! Styled text wrapping
//!
//! All width calculations use unicode display width, not byte length, so
//! wide characters (CJK, emoji) take the cells they really take.

use ratatui::style::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A styled piece of one output line
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub style: Style,
    /// URL this piece links to
    pub link: Option<String>,
}

impl Piece {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }

    pub fn width(&self) -> usize {
        display_width(&self.text)
    }
}

/// Get display width of a string (handles unicode properly)
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Total display width of a sequence of pieces
pub fn pieces_width(pieces: &[Piece]) -> usize {
    pieces.iter().map(Piece::width).sum()
}

/// Wrap one logical line at word boundaries to fit within max_width
///
/// Whitespace inside a line is kept; whitespace at a break is dropped.
/// Words longer than max_width are force-broken by character.
/// An empty line yields a single empty line.
pub fn wrap_pieces(pieces: &[Piece], max_width: usize) -> Vec<Vec<Piece>> {
    if max_width == 0 || pieces_width(pieces) <= max_width {
        return vec![pieces.to_vec()];
    }

    let mut lines = Vec::new();
    let mut current: Vec<Piece> = Vec::new();
    let mut current_width = 0usize;

    for (chunk, piece) in chunks(pieces) {
        let chunk_width = display_width(chunk);
        let blank = chunk.chars().all(char::is_whitespace);

        if blank {
            // Whitespace never starts a wrapped line
            if current_width > 0 && current_width + chunk_width <= max_width {
                push_text(&mut current, chunk, piece);
                current_width += chunk_width;
            }
            continue;
        }

        if current_width + chunk_width <= max_width {
            push_text(&mut current, chunk, piece);
            current_width += chunk_width;
            continue;
        }

        if current_width > 0 {
            lines.push(finish(std::mem::take(&mut current)));
            current_width = 0;
        }

        if chunk_width <= max_width {
            push_text(&mut current, chunk, piece);
            current_width = chunk_width;
            continue;
        }

        // Word doesn't fit on an empty line - break by characters
        for c in chunk.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width > max_width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let mut buf = [0u8; 4];
            push_text(&mut current, c.encode_utf8(&mut buf), piece);
            current_width += char_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(finish(current));
    }
    lines
}

/// Break a logical line by characters only, keeping every space
///
/// Used for code, where whitespace is content.
pub fn hard_wrap(pieces: &[Piece], max_width: usize) -> Vec<Vec<Piece>> {
    if max_width == 0 || pieces_width(pieces) <= max_width {
        return vec![pieces.to_vec()];
    }

    let mut lines = Vec::new();
    let mut current: Vec<Piece> = Vec::new();
    let mut current_width = 0usize;
    for piece in pieces {
        for c in piece.text.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width > max_width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let mut buf = [0u8; 4];
            push_text(&mut current, c.encode_utf8(&mut buf), piece);
            current_width += char_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split pieces into alternating word and whitespace chunks
fn chunks(pieces: &[Piece]) -> impl Iterator<Item = (&str, &Piece)> {
    pieces.iter().flat_map(|piece| {
        let text = piece.text.as_str();
        let mut bounds = Vec::new();
        let mut start = 0;
        let mut prev_blank = None;
        for (idx, c) in text.char_indices() {
            let blank = c.is_whitespace();
            if prev_blank.is_some_and(|prev| prev != blank) {
                bounds.push((start, idx));
                start = idx;
            }
            prev_blank = Some(blank);
        }
        if start < text.len() {
            bounds.push((start, text.len()));
        }
        bounds
            .into_iter()
            .map(move |(from, to)| (&text[from..to], piece))
    })
}

/// Append text, merging with the previous piece when it has the same look
fn push_text(line: &mut Vec<Piece>, text: &str, like: &Piece) {
    match line.last_mut() {
        Some(last) if last.style == like.style && last.link == like.link => {
            last.text.push_str(text);
        }
        _ => line.push(Piece {
            text: text.to_string(),
            style: like.style,
            link: like.link.clone(),
        }),
    }
}

/// Drop whitespace left at the end of a wrapped line
fn finish(mut line: Vec<Piece>) -> Vec<Piece> {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end().len();
        if trimmed > 0 {
            last.text.truncate(trimmed);
            break;
        }
        line.pop();
    }
    line
}

//! Substring search over article text
//!
//! Search runs on the cleared text, so markup never produces or hides a hit.
//! Offsets are byte offsets into that text; occurrences may overlap.

use std::ops::Range;

use crate::markdown::{clear, GrammarError};

/// Hits for one query in one article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// The article with markup removed
    pub plain: String,
    /// Byte ranges of every hit in `plain`
    pub hits: Vec<Range<usize>>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// 1-based line number and text of the line holding `hit`
    pub fn line_of(&self, hit: &Range<usize>) -> (usize, &str) {
        let bounds = self.line_bounds(hit);
        let number = self.plain[..bounds.start].matches('\n').count() + 1;
        (number, &self.plain[bounds])
    }

    /// Byte range of the line holding `hit`, line break excluded
    pub fn line_bounds(&self, hit: &Range<usize>) -> Range<usize> {
        let start = self.plain[..hit.start].rfind('\n').map_or(0, |idx| idx + 1);
        let end = self.plain[hit.start..]
            .find('\n')
            .map_or(self.plain.len(), |idx| hit.start + idx);
        start..end
    }
}

/// Clear `source` and find every occurrence of `query` in it
pub fn search(source: &str, query: &str, ignore_case: bool) -> Result<SearchResult, GrammarError> {
    let plain = clear(Some(source))?.unwrap_or_default();
    let hits = find_all(&plain, query, ignore_case);
    tracing::debug!(query, hits = hits.len(), "Searched article");
    Ok(SearchResult { plain, hits })
}

/// Start offsets of every occurrence of `substr` in `text`
pub fn indexes_of(text: &str, substr: &str, ignore_case: bool) -> Vec<usize> {
    find_all(text, substr, ignore_case)
        .into_iter()
        .map(|hit| hit.start)
        .collect()
}

/// Byte ranges of every occurrence of `substr` in `text`
pub fn find_all(text: &str, substr: &str, ignore_case: bool) -> Vec<Range<usize>> {
    if substr.is_empty() || text.is_empty() {
        return Vec::new();
    }

    if !ignore_case {
        return text
            .char_indices()
            .filter(|(start, _)| text[*start..].starts_with(substr))
            .map(|(start, _)| start..start + substr.len())
            .collect();
    }

    let needle: Vec<char> = substr.chars().flat_map(char::to_lowercase).collect();
    text.char_indices()
        .filter_map(|(start, _)| {
            folded_match_len(&text[start..], &needle).map(|len| start..start + len)
        })
        .collect()
}

/// Bytes of `haystack` matching the lowercased `needle` at its start
fn folded_match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (idx, c) in haystack.char_indices() {
        if matched == needle.len() {
            return Some(idx);
        }
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
    }
    (matched == needle.len()).then_some(haystack.len())
}

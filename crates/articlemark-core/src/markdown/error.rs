//! Error types for markdown processing
//!
//! User input never produces an error: text that matches no rule stays
//! literal. These errors mean the grammar table itself is inconsistent.

use thiserror::Error;

use super::grammar::Rule;

/// The compiled grammar broke one of its own contracts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar pattern `{pattern}` failed to compile: {message}")]
    Compile {
        pattern: &'static str,
        message: String,
    },

    #[error("match at byte {offset} did not belong to any grammar rule")]
    UnknownRule { offset: usize },

    #[error("rule `{rule}` produced an empty match at byte {offset}")]
    EmptyMatch { rule: Rule, offset: usize },

    #[error("rule `{rule}` matched {matched:?} but its inner pattern did not")]
    Extraction { rule: Rule, matched: String },
}

/// Failure while looking for the next grammar match
#[derive(Debug, Error)]
pub(crate) enum ScanError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The backtracking engine hit its limit on the line starting at `offset`
    #[error("regex engine gave up at byte {offset}: {source}")]
    Engine {
        offset: usize,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

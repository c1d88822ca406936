//! Pattern compilation against the host regex engine.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::MatchMode;

/// Compilation failures. The fitness evaluator turns these into the
/// `-inf` sentinel; they never reach the caller of a search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Empty pattern")]
    Empty,
    #[error("Invalid pattern {pattern:?}: {reason}")]
    Invalid { pattern: String, reason: String },
}

/// A compiled candidate.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    mode: MatchMode,
    regex: Regex,
    /// Anchored form, built on first whole-string query in span mode.
    whole: OnceLock<Option<Regex>>,
}

impl CompiledPattern {
    /// Compile `source` for the given matching mode.
    ///
    /// The raw text is always compiled first, so wrapping it for whole-string
    /// matching can never turn an invalid fragment into a valid one.
    pub fn compile(source: &str, mode: MatchMode) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }
        let raw = build(source, source)?;
        let regex = match mode {
            MatchMode::Span => raw,
            MatchMode::Classic => build(&anchored(source), source)?,
        };
        Ok(Self {
            source: source.to_string(),
            mode,
            regex,
            whole: OnceLock::new(),
        })
    }

    /// Whether `text` is accepted under this pattern's mode.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Longest single match inside `text`, in characters (0 when nothing matches).
    pub fn longest_span(&self, text: &str) -> usize {
        self.regex
            .find_iter(text)
            .map(|m| m.as_str().chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Whether the pattern can match all of `text`.
    pub fn matches_whole(&self, text: &str) -> bool {
        match self.mode {
            MatchMode::Classic => self.regex.is_match(text),
            // leftmost-first may stop short of a full match, so check anchored
            MatchMode::Span => self
                .whole
                .get_or_init(|| Regex::new(&anchored(&self.source)).ok())
                .as_ref()
                .is_some_and(|r| r.is_match(text)),
        }
    }
}

fn anchored(source: &str) -> String {
    format!("^(?:{source})$")
}

fn build(text: &str, source: &str) -> Result<Regex, PatternError> {
    Regex::new(text).map_err(|e| PatternError::Invalid {
        pattern: source.to_string(),
        reason: e.to_string(),
    })
}

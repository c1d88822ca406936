//! Search input, result and progress types.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SchemaError;

/// Caller-supplied search problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchInput {
    /// Symbols usable during mutation, in order. Duplicates are ignored.
    #[serde(default)]
    pub alphabet: Vec<String>,
    /// Strings that must be classified positive.
    #[serde(default)]
    pub good: Vec<String>,
    /// Strings that must be classified negative.
    #[serde(default)]
    pub bad: Vec<String>,
}

impl SearchInput {
    /// Build an input from string slices.
    pub fn new(alphabet: &[&str], good: &[&str], bad: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            alphabet: owned(alphabet),
            good: owned(good),
            bad: owned(bad),
        }
    }

    /// A small binary-string problem.
    pub fn example() -> Self {
        Self::new(&["0", "1"], &["101010"], &["111111", "000000"])
    }

    /// Parse an input from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an input from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Winning pattern text; empty when nothing beat the empty candidate.
    pub pattern: String,
    /// Fitness of the winning pattern (may be infinite).
    pub fitness_score: f64,
    /// Share of examples classified correctly, 0..=100.
    pub percent_correct: u8,
    /// Run statistics.
    pub stats: SearchStats,
}

/// Statistics about a finished search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Lineages that ran.
    pub lineages: usize,
    /// Generations actually executed, summed over lineages.
    pub generations: u64,
    /// Fitness evaluations performed, including the final rescore of the winner.
    pub evaluations: u64,
    /// Whether the winner is a perfect classifier.
    pub perfect: bool,
    /// Why the search stopped.
    pub stop_reason: StopReason,
    /// Wall-clock duration.
    pub elapsed_seconds: f64,
}

/// Reason a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every lineage used its generation budget.
    Completed,
    /// A lineage found a perfect classifier.
    PerfectMatch,
    /// The caller cancelled the run.
    Cancelled,
}

/// Progress report handed to the observer after each lineage finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProgress {
    pub lineages_completed: usize,
    pub lineages_total: usize,
    /// Best fitness reached by the lineage that just finished.
    pub best_fitness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_json_defaults() {
        let input = SearchInput::from_json_str(r#"{"good": ["abc"]}"#).unwrap();
        assert!(input.alphabet.is_empty());
        assert_eq!(input.good, vec!["abc".to_string()]);
        assert!(input.bad.is_empty());
    }

    #[test]
    fn test_example_roundtrip() {
        let input = SearchInput::example();
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(SearchInput::from_json_str(&json).unwrap(), input);
    }

    #[test]
    fn test_malformed_json() {
        let result = SearchInput::from_json_str("{\"good\": 3}");
        assert!(matches!(result, Err(SchemaError::Json(_))));
    }
}

//! Search configuration types.
//!
//! Every knob of the lineage search is exposed here: population shape,
//! mutation schedule, operator weights and fitness weighting.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for a pattern search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of independent lineages.
    #[serde(default = "default_lineages")]
    pub lineages: usize,
    /// Generation budget per lineage.
    #[serde(default = "default_generations")]
    pub generations_per_lineage: usize,
    /// Inclusive (min, max) number of mutation steps applied per generation.
    #[serde(default = "default_mutations_per_generation")]
    pub mutations_per_generation: (usize, usize),
    /// Operator selection weights.
    #[serde(default)]
    pub mutation_weights: MutationWeights,
    /// Fitness weighting and matching mode.
    #[serde(default)]
    pub fitness: FitnessConfig,
    /// What each generation mutates.
    #[serde(default)]
    pub policy: LineagePolicy,
    /// Candidate representation.
    #[serde(default)]
    pub representation: Representation,
    /// Let the other lineages stop once one finds a perfect classifier.
    #[serde(default = "default_stop_on_perfect")]
    pub stop_on_perfect: bool,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lineages: default_lineages(),
            generations_per_lineage: default_generations(),
            mutations_per_generation: default_mutations_per_generation(),
            mutation_weights: MutationWeights::default(),
            fitness: FitnessConfig::default(),
            policy: LineagePolicy::default(),
            representation: Representation::default(),
            stop_on_perfect: default_stop_on_perfect(),
            random_seed: None,
        }
    }
}

fn default_lineages() -> usize {
    100
}
fn default_generations() -> usize {
    500
}
fn default_mutations_per_generation() -> (usize, usize) {
    (1, 3)
}
fn default_stop_on_perfect() -> bool {
    true
}

/// Relative weights of the four structural operators.
///
/// Weights need not sum to one; each roll picks an operator with probability
/// proportional to its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationWeights {
    #[serde(default = "default_insert_weight")]
    pub insert: f64,
    #[serde(default = "default_delete_weight")]
    pub delete: f64,
    #[serde(default = "default_replace_weight")]
    pub replace: f64,
    #[serde(default = "default_duplicate_weight")]
    pub duplicate: f64,
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            insert: default_insert_weight(),
            delete: default_delete_weight(),
            replace: default_replace_weight(),
            duplicate: default_duplicate_weight(),
        }
    }
}

impl MutationWeights {
    /// Weights in operator order (insert, delete, replace, duplicate).
    pub fn as_array(&self) -> [f64; 4] {
        [self.insert, self.delete, self.replace, self.duplicate]
    }
}

fn default_insert_weight() -> f64 {
    0.15
}
fn default_delete_weight() -> f64 {
    0.25
}
fn default_replace_weight() -> f64 {
    0.55
}
fn default_duplicate_weight() -> f64 {
    0.05
}

/// How candidates are matched against the example corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMode {
    /// Whole-string matching; each example is simply accepted or rejected.
    Classic,
    /// Unanchored matching scored by the longest match span.
    #[default]
    Span,
}

/// Fitness weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Matching mode.
    #[serde(default)]
    pub mode: MatchMode,
    /// Reward per correctly classified example (per matched character in span mode).
    #[serde(default = "default_correctness_bonus")]
    pub correctness_bonus: f64,
    /// Reward (a negative number) per misclassified example or accidentally
    /// matched negative character.
    #[serde(default = "default_incorrectness_penalty")]
    pub incorrectness_penalty: f64,
    /// Subtracted once per character of the serialized pattern.
    #[serde(default = "default_complexity_penalty")]
    pub complexity_penalty: f64,
    /// Score zero whenever the positive examples earned no reward.
    #[serde(default)]
    pub clamp_unrewarded: bool,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            correctness_bonus: default_correctness_bonus(),
            incorrectness_penalty: default_incorrectness_penalty(),
            complexity_penalty: default_complexity_penalty(),
            clamp_unrewarded: false,
        }
    }
}

fn default_correctness_bonus() -> f64 {
    10.0
}
fn default_incorrectness_penalty() -> f64 {
    -5.0
}
fn default_complexity_penalty() -> f64 {
    1.0
}

/// Which candidate a lineage mutates each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineagePolicy {
    /// Always mutate the best candidate seen so far.
    #[default]
    HillClimb,
    /// Mutate a freely drifting current candidate; best is only a record.
    Drift,
}

/// Candidate representation used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Representation {
    /// Flat sequence of alphabet symbols.
    #[default]
    Sequence,
    /// Small pattern syntax tree.
    Tree,
}

// ============================================================================
// Validation
// ============================================================================

/// Search configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchConfigError {
    #[error("At least one lineage is required")]
    NoLineages,
    #[error("Generations per lineage must be positive")]
    NoGenerations,
    #[error("Invalid mutation range: {0}")]
    InvalidMutationRange(String),
    #[error("Invalid mutation weight: {0}")]
    InvalidWeight(String),
    #[error("Fitness parameter {name} must be finite, got {value}")]
    NonFiniteFitness { name: &'static str, value: f64 },
}

impl SearchConfig {
    /// Validate search configuration.
    pub fn validate(&self) -> Result<(), SearchConfigError> {
        if self.lineages == 0 {
            return Err(SearchConfigError::NoLineages);
        }
        if self.generations_per_lineage == 0 {
            return Err(SearchConfigError::NoGenerations);
        }

        let (min, max) = self.mutations_per_generation;
        if min == 0 {
            return Err(SearchConfigError::InvalidMutationRange(
                "minimum must be at least 1".to_string(),
            ));
        }
        if min > max {
            return Err(SearchConfigError::InvalidMutationRange(format!(
                "min ({min}) > max ({max})"
            )));
        }

        let weights = self.mutation_weights.as_array();
        for w in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(SearchConfigError::InvalidWeight(format!(
                    "Weight {w} must be finite and non-negative"
                )));
            }
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(SearchConfigError::InvalidWeight(
                "at least one weight must be positive".to_string(),
            ));
        }

        let check_finite = |value: f64, name: &'static str| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(SearchConfigError::NonFiniteFitness { name, value })
            }
        };
        check_finite(self.fitness.correctness_bonus, "correctness_bonus")?;
        check_finite(self.fitness.incorrectness_penalty, "incorrectness_penalty")?;
        check_finite(self.fitness.complexity_penalty, "complexity_penalty")?;

        Ok(())
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Errors raised while loading schema types from disk.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_mutation_range() {
        let config = SearchConfig {
            mutations_per_generation: (0, 2),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SearchConfigError::InvalidMutationRange(_))
        ));

        let config = SearchConfig {
            mutations_per_generation: (4, 2),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SearchConfigError::InvalidMutationRange(_))
        ));
    }

    #[test]
    fn test_rejects_bad_weights() {
        let config = SearchConfig {
            mutation_weights: MutationWeights {
                insert: 0.0,
                delete: 0.0,
                replace: 0.0,
                duplicate: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SearchConfigError::InvalidWeight(_))
        ));

        let config = SearchConfig {
            mutation_weights: MutationWeights {
                delete: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_fitness() {
        let mut config = SearchConfig::default();
        config.fitness.complexity_penalty = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(SearchConfigError::NonFiniteFitness {
                name: "complexity_penalty",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SearchConfig::from_json_str(r#"{"lineages": 7, "fitness": {"mode": "Classic"}}"#)
                .unwrap();
        assert_eq!(config.lineages, 7);
        assert_eq!(config.generations_per_lineage, 500);
        assert_eq!(config.fitness.mode, MatchMode::Classic);
        assert_eq!(config.fitness.correctness_bonus, 10.0);
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"random_seed": 9, "policy": "Drift"}}"#).unwrap();

        let config = SearchConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.random_seed, Some(9));
        assert_eq!(config.policy, LineagePolicy::Drift);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SearchConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(SchemaError::Io(_))));
    }
}

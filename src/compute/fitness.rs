//! Fitness and percent-correct scoring of candidates against an example corpus.
//!
//! Scores are plain `f64` values with two sentinels:
//!
//! - `-inf`: the candidate is empty or does not compile
//! - `+inf`: span mode only, the candidate is a perfect classifier (every
//!   positive example matches in full, no negative example matches at all)
//!
//! Both functions are pure: no randomness, and the only interior state is an
//! atomic call counter, so one evaluator can be shared by every lineage thread.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::schema::{FitnessConfig, MatchMode, SearchInput};

use super::genotype::Genotype;
use super::pattern::CompiledPattern;

/// Positive and negative examples, fixed for the duration of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Corpus {
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Self {
        Self { positive, negative }
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&SearchInput> for Corpus {
    fn from(input: &SearchInput) -> Self {
        Self::new(input.good.clone(), input.bad.clone())
    }
}

/// Whether a score is the perfect-classifier sentinel.
pub fn is_perfect(score: f64) -> bool {
    score == f64::INFINITY
}

/// Scores candidates against a corpus.
#[derive(Debug)]
pub struct FitnessEvaluator {
    config: FitnessConfig,
    corpus: Corpus,
    evaluations: AtomicU64,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(config: FitnessConfig, corpus: Corpus) -> Self {
        Self {
            config,
            corpus,
            evaluations: AtomicU64::new(0),
        }
    }

    /// Fitness computations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Fitness of a candidate.
    pub fn fitness<G: Genotype>(&self, candidate: &G) -> f64 {
        self.score_pattern(&candidate.to_pattern())
    }

    /// Percent of examples a candidate classifies correctly.
    pub fn percent_correct<G: Genotype>(&self, candidate: &G) -> u8 {
        self.percent_correct_pattern(&candidate.to_pattern())
    }

    /// Fitness of serialized pattern text.
    pub fn score_pattern(&self, pattern: &str) -> f64 {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        let Ok(compiled) = CompiledPattern::compile(pattern, self.config.mode) else {
            return f64::NEG_INFINITY;
        };

        let (positive_reward, negative_reward) = match self.config.mode {
            MatchMode::Classic => self.classic_rewards(&compiled),
            MatchMode::Span => {
                if self.is_perfect_classifier(&compiled) {
                    return f64::INFINITY;
                }
                self.span_rewards(&compiled)
            }
        };

        if self.config.clamp_unrewarded && positive_reward <= 0.0 {
            return 0.0;
        }

        positive_reward + negative_reward - self.config.complexity_penalty * complexity(pattern)
    }

    /// Rounded share of correctly classified examples, 0 for an empty corpus
    /// or an empty / invalid pattern.
    pub fn percent_correct_pattern(&self, pattern: &str) -> u8 {
        if self.corpus.is_empty() {
            return 0;
        }
        let Ok(compiled) = CompiledPattern::compile(pattern, self.config.mode) else {
            return 0;
        };

        let positive = self
            .corpus
            .positive
            .iter()
            .filter(|s| compiled.is_match(s))
            .count();
        let negative = self
            .corpus
            .negative
            .iter()
            .filter(|s| !compiled.is_match(s))
            .count();

        let share = 100.0 * (positive + negative) as f64 / self.corpus.len() as f64;
        share.round().clamp(0.0, 100.0) as u8
    }

    fn classic_rewards(&self, compiled: &CompiledPattern) -> (f64, f64) {
        let bonus = self.config.correctness_bonus;
        let penalty = self.config.incorrectness_penalty;

        let positive = self
            .corpus
            .positive
            .iter()
            .map(|s| if compiled.is_match(s) { bonus } else { penalty })
            .sum();
        let negative = self
            .corpus
            .negative
            .iter()
            .map(|s| if compiled.is_match(s) { penalty } else { bonus })
            .sum();
        (positive, negative)
    }

    fn span_rewards(&self, compiled: &CompiledPattern) -> (f64, f64) {
        let spans = |examples: &[String]| -> usize {
            examples.iter().map(|s| compiled.longest_span(s)).sum()
        };
        (
            self.config.correctness_bonus * spans(&self.corpus.positive) as f64,
            self.config.incorrectness_penalty * spans(&self.corpus.negative) as f64,
        )
    }

    fn is_perfect_classifier(&self, compiled: &CompiledPattern) -> bool {
        !self.corpus.positive.is_empty()
            && !self.corpus.negative.iter().any(|s| compiled.is_match(s))
            && self.corpus.positive.iter().all(|s| compiled.matches_whole(s))
    }
}

/// Complexity of a pattern: its serialized length in characters.
pub fn complexity(pattern: &str) -> f64 {
    pattern.chars().count() as f64
}

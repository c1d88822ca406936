//! Regex Evolve - Evolutionary inference of regular expressions from examples.
//!
//! Given an alphabet of regex fragments plus strings that should and should
//! not match, the search grows candidate patterns by random insert, delete,
//! replace and duplicate edits, keeping whatever scores best against the
//! examples.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Search input, configuration and result types
//! - `compute`: Candidates, fitness evaluation, lineages and the population search
//!
//! # Example
//!
//! ```rust,no_run
//! use regex_evolve::{
//!     compute::compute,
//!     schema::{SearchConfig, SearchInput},
//! };
//!
//! let input = SearchInput::new(&["0", "1"], &["101010"], &["111111", "000000"]);
//! let config = SearchConfig::default();
//!
//! let result = compute(&input, &config).expect("default config is valid");
//! println!("{} ({}% correct)", result.pattern, result.percent_correct);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Candidate, FitnessEvaluator, PatternSearch, PatternTree, compute};
pub use schema::{SearchConfig, SearchInput, SearchResult};

//! Compute module - Candidate representations, scoring and the evolutionary search.

mod alphabet;
mod candidate;
mod fitness;
mod genotype;
mod lineage;
mod mutation;
mod pattern;
mod search;
mod tree;

pub use alphabet::*;
pub use candidate::*;
pub use fitness::*;
pub use genotype::*;
pub use lineage::*;
pub use mutation::*;
pub use pattern::*;
pub use search::*;
pub use tree::*;

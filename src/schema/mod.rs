//! Schema module - Configuration, input and result types for pattern search.

mod config;
mod corpus;

pub use config::*;
pub use corpus::*;

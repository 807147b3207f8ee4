//! Consensus module - Block structure and validation

mod block;
mod validation;

pub use block::*;
pub use validation::*;

//! Storage module - in-memory chain state

mod state;

pub use state::*;

//! HTTP API module
//!
//! `GET /` returns the chain, `POST /` appends a transaction.

mod methods;
mod server;

pub use methods::*;
pub use server::*;

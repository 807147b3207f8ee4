//! Ledger Core Library
//!
//! An in-memory chain of blocks, each carrying one transaction and bound to
//! its predecessor by a SHA-256 content hash, served over a two-route HTTP
//! API. New chains are adopted only when strictly longer than the current one.

pub mod config;
pub mod consensus;
pub mod crypto;
pub mod logging;
pub mod node;
pub mod rpc;
pub mod storage;

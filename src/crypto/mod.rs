//! Cryptography module - SHA-256 content hashing

mod hash;

pub use hash::*;

//! Block structure for the ledger
//!
//! Defines the transaction payload, the immutable block, its content hash,
//! and the factory that links a new block to its predecessor.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Block construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("System clock unavailable")]
    ClockUnavailable,
    #[error("Block index overflow after {0}")]
    IndexOverflow(u64),
}

/// A single value transfer. Addresses and amount are not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    #[serde(alias = "source")]
    pub source: String,
    #[serde(alias = "destination")]
    pub destination: String,
    #[serde(alias = "amount")]
    pub amount: f64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(source: impl Into<String>, destination: impl Into<String>, amount: f64) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            amount,
        }
    }
}

/// A block carrying exactly one transaction.
///
/// On the wire the transaction fields are flattened into the block object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Position in the chain, genesis is 0
    pub index: u64,
    /// Wall-clock creation time, RFC 3339
    pub timestamp: String,
    /// Hex SHA-256 over every other field
    pub hash: String,
    /// Hash of the preceding block, empty for genesis
    pub prev_hash: String,
    #[serde(flatten)]
    pub transaction: Transaction,
}

impl Block {
    /// Build the block that follows `prev`, stamped with the current time
    pub fn next(prev: &Block, transaction: Transaction) -> Result<Self, BlockError> {
        Self::next_at(prev, transaction, current_timestamp()?)
    }

    /// Build the block that follows `prev` with an explicit timestamp
    pub fn next_at(
        prev: &Block,
        transaction: Transaction,
        timestamp: impl Into<String>,
    ) -> Result<Self, BlockError> {
        let index = prev
            .index
            .checked_add(1)
            .ok_or(BlockError::IndexOverflow(prev.index))?;

        let mut block = Self {
            index,
            timestamp: timestamp.into(),
            hash: String::new(),
            prev_hash: prev.hash.clone(),
            transaction,
        };
        block.hash = block.calculate_hash();
        Ok(block)
    }

    /// Serialize the hashed fields into the record fed to the digest.
    ///
    /// Order: index, timestamp, source, destination, amount, prev_hash.
    /// The index is written as decimal digits and the amount in its
    /// shortest round-trip form without exponent.
    pub fn to_record(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.index.to_string().as_bytes());
        bytes.extend_from_slice(self.timestamp.as_bytes());
        bytes.extend_from_slice(self.transaction.source.as_bytes());
        bytes.extend_from_slice(self.transaction.destination.as_bytes());
        bytes.extend_from_slice(self.transaction.amount.to_string().as_bytes());
        bytes.extend_from_slice(self.prev_hash.as_bytes());
        bytes
    }

    /// Recompute the content hash. Ignores the stored `hash` field.
    pub fn calculate_hash(&self) -> String {
        crate::crypto::hash_hex(&self.to_record())
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.prev_hash.is_empty()
    }
}

/// Current UTC time rendered as RFC 3339 with nanoseconds
pub fn current_timestamp() -> Result<String, BlockError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| BlockError::ClockUnavailable)?;
    let secs = i64::try_from(elapsed.as_secs()).map_err(|_| BlockError::ClockUnavailable)?;
    let now: DateTime<Utc> = DateTime::from_timestamp(secs, elapsed.subsec_nanos())
        .ok_or(BlockError::ClockUnavailable)?;
    Ok(now.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

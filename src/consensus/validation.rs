//! Block and chain validation
//!
//! Pure functions for validating blocks and chains.

use crate::consensus::Block;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid index: expected {expected}, found {found}")]
    InvalidIndex { expected: u64, found: u64 },
    #[error("Invalid previous hash")]
    InvalidPrevHash,
    #[error("Invalid block hash")]
    InvalidHash,
    #[error("Invalid genesis block")]
    InvalidGenesis,
    #[error("Empty chain")]
    EmptyChain,
}

/// Validate a candidate block against its claimed predecessor
///
/// Checks index linkage, then hash linkage, then the content hash.
pub fn validate_block(candidate: &Block, prev: &Block) -> Result<(), ValidationError> {
    let expected = prev.index.wrapping_add(1);
    if prev.index == u64::MAX || candidate.index != expected {
        return Err(ValidationError::InvalidIndex {
            expected,
            found: candidate.index,
        });
    }

    if candidate.prev_hash != prev.hash {
        return Err(ValidationError::InvalidPrevHash);
    }

    if candidate.calculate_hash() != candidate.hash {
        return Err(ValidationError::InvalidHash);
    }

    Ok(())
}

/// Boolean form of [`validate_block`]
pub fn is_valid(candidate: &Block, prev: &Block) -> bool {
    validate_block(candidate, prev).is_ok()
}

/// Validate a whole chain, starting from its genesis block
///
/// The genesis block carries no content hash, so only its position and
/// empty linkage are checked.
pub fn validate_chain(blocks: &[Block]) -> Result<(), ValidationError> {
    let genesis = blocks.first().ok_or(ValidationError::EmptyChain)?;
    if !genesis.is_genesis() {
        return Err(ValidationError::InvalidGenesis);
    }

    for pair in blocks.windows(2) {
        validate_block(&pair[1], &pair[0])?;
    }

    Ok(())
}

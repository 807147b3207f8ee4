//! Genesis block generation
//!
//! The genesis block anchors the chain: index 0, an empty transaction and
//! empty linkage fields. It carries no content hash.

use crate::consensus::{current_timestamp, Block, BlockError, Transaction};

/// Create the genesis block stamped with the current time
pub fn create_genesis_block() -> Result<Block, BlockError> {
    Ok(create_genesis_block_at(current_timestamp()?))
}

/// Create the genesis block with an explicit timestamp
pub fn create_genesis_block_at(timestamp: impl Into<String>) -> Block {
    Block {
        index: 0,
        timestamp: timestamp.into(),
        hash: String::new(),
        prev_hash: String::new(),
        transaction: Transaction::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::is_valid;

    #[test]
    fn test_genesis_shape() {
        let genesis = create_genesis_block().unwrap();

        assert_eq!(genesis.index, 0);
        assert!(genesis.hash.is_empty());
        assert!(genesis.prev_hash.is_empty());
        assert_eq!(genesis.transaction, Transaction::new("", "", 0.0));
        assert!(!genesis.timestamp.is_empty());
        assert!(genesis.is_genesis());
    }

    #[test]
    fn test_genesis_is_deterministic_for_fixed_time() {
        assert_eq!(
            create_genesis_block_at("2023-01-01"),
            create_genesis_block_at("2023-01-01")
        );
    }

    #[test]
    fn test_first_block_links_to_genesis() {
        let genesis = create_genesis_block_at("2023-01-01");
        let block = Block::next(&genesis, Transaction::new("Alice", "Bob", 25.5)).unwrap();

        assert_eq!(block.prev_hash, "");
        assert!(is_valid(&block, &genesis));
    }
}

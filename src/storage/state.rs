//! Chain state management
//!
//! Holds the ordered block sequence and the shared handle that serializes
//! every read-modify-write cycle against it.

use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::consensus::{validate_block, Block, BlockError, Transaction, ValidationError};

/// Chain store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Chain not initialized")]
    NotReady,
    #[error("Chain already initialized")]
    AlreadyInitialized,
    #[error("Chain lock poisoned")]
    Poisoned,
    #[error("Block rejected: {0}")]
    Validation(#[from] ValidationError),
    #[error("Block construction failed: {0}")]
    Block(#[from] BlockError),
}

/// Longest-chain rule
///
/// Returns `candidate` only when it is strictly longer than `current`.
/// Ties keep the existing chain.
pub fn longest_chain<'a>(current: &'a [Block], candidate: &'a [Block]) -> &'a [Block] {
    if candidate.len() > current.len() {
        candidate
    } else {
        current
    }
}

/// Append-only block sequence; the tip is the last element
#[derive(Debug, Default, Clone)]
pub struct ChainState {
    blocks: Vec<Block>,
}

impl ChainState {
    /// Create an empty, uninitialized chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain containing only `genesis`
    pub fn with_genesis(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Index of the tip block
    pub fn height(&self) -> Option<u64> {
        self.tip().map(|b| b.index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a block that extends the tip.
    ///
    /// Equivalent to replacing the chain with `current + block`, which is
    /// always strictly longer, without copying the sequence.
    pub fn append(&mut self, block: Block) -> Result<(), StoreError> {
        let tip = self.tip().ok_or(StoreError::NotReady)?;
        validate_block(&block, tip)?;
        self.blocks.push(block);
        Ok(())
    }

    /// Adopt `candidate` if it is strictly longer. Returns whether it was adopted.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        let current_len = self.blocks.len();
        if longest_chain(&self.blocks, &candidate).len() != current_len {
            self.blocks = candidate;
            true
        } else {
            false
        }
    }
}

/// Shared, cloneable handle to the chain state
#[derive(Debug, Clone, Default)]
pub struct ChainStore {
    inner: Arc<Mutex<ChainState>>,
}

impl ChainStore {
    /// Create a store that has not received its genesis block yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `genesis`
    pub fn with_genesis(genesis: Block) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChainState::with_genesis(genesis))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ChainState>, StoreError> {
        self.inner.lock().map_err(|_| {
            tracing::error!("chain lock poisoned");
            StoreError::Poisoned
        })
    }

    /// Install the genesis block. Fails if the chain already has blocks.
    pub fn initialize(&self, genesis: Block) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.is_empty() {
            return Err(StoreError::AlreadyInitialized);
        }
        *state = ChainState::with_genesis(genesis);
        Ok(())
    }

    /// Copy of the full chain in index order
    pub fn snapshot(&self) -> Result<Vec<Block>, StoreError> {
        let state = self.lock()?;
        if state.is_empty() {
            return Err(StoreError::NotReady);
        }
        Ok(state.blocks().to_vec())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    /// Build a block for `transaction` on top of the tip and append it.
    ///
    /// The lock is held from reading the tip until the block is appended,
    /// so concurrent callers can never build on the same tip.
    pub fn append_transaction(&self, transaction: Transaction) -> Result<Block, StoreError> {
        let mut state = self.lock()?;
        let tip = state.tip().ok_or(StoreError::NotReady)?;
        let block = Block::next(tip, transaction)?;
        state.append(block.clone())?;

        tracing::info!(index = block.index, hash = %block.hash, "block appended");
        tracing::debug!(chain = ?state.blocks(), "chain after append");
        Ok(block)
    }

    /// Apply the longest-chain rule to `candidate`
    pub fn replace_chain(&self, candidate: Vec<Block>) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let candidate_len = candidate.len();
        let replaced = state.replace_chain(candidate);
        if replaced {
            tracing::info!(len = candidate_len, "chain replaced");
        } else {
            tracing::debug!(
                current = state.len(),
                candidate = candidate_len,
                "candidate chain not longer, keeping current"
            );
        }
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::validate_chain;

    fn genesis() -> Block {
        Block {
            index: 0,
            timestamp: "2023-01-01".into(),
            ..Block::default()
        }
    }

    fn indexed(n: u64) -> Vec<Block> {
        (0..n)
            .map(|i| Block {
                index: i,
                hash: format!("hash{}", i),
                ..Block::default()
            })
            .collect()
    }

    #[test]
    fn test_longest_chain_rule() {
        let current = indexed(2);
        let longer = indexed(4);
        let equal = indexed(2);
        let shorter = indexed(1);

        assert_eq!(longest_chain(&current, &longer), longer.as_slice());
        assert_eq!(longest_chain(&current, &equal).as_ptr(), current.as_ptr());
        assert_eq!(longest_chain(&current, &shorter), current.as_slice());
        assert_eq!(longest_chain(&current, &[]), current.as_slice());
    }

    #[test]
    fn test_replace_chain() {
        let mut state = ChainState::with_genesis(genesis());

        assert!(state.replace_chain(indexed(4)));
        assert_eq!(state.len(), 4);

        assert!(!state.replace_chain(indexed(1)));
        assert_eq!(state.len(), 4);

        let mut equal = indexed(4);
        equal[3].hash = "other".into();
        assert!(!state.replace_chain(equal));
        assert_eq!(state.blocks()[3].hash, "hash3");
    }

    #[test]
    fn test_append_validates_against_tip() {
        let mut state = ChainState::with_genesis(genesis());
        let tip = state.tip().unwrap().clone();

        let good = Block::next_at(&tip, Transaction::new("a", "b", 1.0), "t1").unwrap();
        state.append(good).unwrap();
        assert_eq!(state.height(), Some(1));

        let mut bad = Block::next_at(&tip, Transaction::new("a", "b", 1.0), "t2").unwrap();
        bad.hash = "x".into();
        assert!(matches!(state.append(bad), Err(StoreError::Validation(_))));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_append_on_empty_state() {
        let mut state = ChainState::new();
        let block = Block::next_at(&genesis(), Transaction::default(), "t").unwrap();
        assert!(matches!(state.append(block), Err(StoreError::NotReady)));
    }

    #[test]
    fn test_store_not_ready_until_initialized() {
        let store = ChainStore::new();
        assert!(matches!(store.snapshot(), Err(StoreError::NotReady)));
        assert!(matches!(
            store.append_transaction(Transaction::default()),
            Err(StoreError::NotReady)
        ));

        store.initialize(genesis()).unwrap();
        assert_eq!(store.snapshot().unwrap().len(), 1);
        assert!(matches!(
            store.initialize(genesis()),
            Err(StoreError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_store_append_transaction() {
        let store = ChainStore::with_genesis(genesis());
        let b1 = store
            .append_transaction(Transaction::new("Alice", "Bob", 25.5))
            .unwrap();
        let b2 = store
            .append_transaction(Transaction::new("Bob", "Carol", 1.0))
            .unwrap();

        assert_eq!(b1.index, 1);
        assert_eq!(b2.index, 2);
        assert_eq!(b2.prev_hash, b1.hash);

        let chain = store.snapshot().unwrap();
        assert_eq!(chain.len(), 3);
        assert!(validate_chain(&chain).is_ok());
    }

    #[test]
    fn test_store_concurrent_appends() {
        let store = ChainStore::with_genesis(genesis());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .append_transaction(Transaction::new(
                                format!("t{}", t),
                                "sink",
                                i as f64,
                            ))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let chain = store.snapshot().unwrap();
        assert_eq!(chain.len(), 201);
        assert!(validate_chain(&chain).is_ok());
    }

    #[test]
    fn test_store_replace_chain() {
        let store = ChainStore::with_genesis(genesis());
        assert!(!store.replace_chain(vec![]).unwrap());
        assert!(store.replace_chain(indexed(3)).unwrap());
        assert_eq!(store.len().unwrap(), 3);
    }
}

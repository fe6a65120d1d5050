use crate::crypto::{sha3_256, Hash256};
use crate::error::{ChainError, Result};
use crate::hash::{HashProvider, Sha3HashProvider};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// An agreed, immutable batch of transactions. Its identity is its hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub prev_hash: Hash256,
    pub txs_number: u64,
    pub merkle_root: Hash256,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Builds a block, deriving `txs_number` and `merkle_root` from `transactions`.
    pub fn new(height: u64, prev_hash: Hash256, transactions: Vec<Transaction>) -> Self {
        let merkle_root = Self::calculate_merkle_root(&transactions);
        Self::with_merkle_root(height, prev_hash, merkle_root, transactions)
    }

    /// Builds a block around a merkle root computed elsewhere.
    pub fn with_merkle_root(
        height: u64,
        prev_hash: Hash256,
        merkle_root: Hash256,
        transactions: Vec<Transaction>,
    ) -> Self {
        Block {
            height,
            prev_hash,
            txs_number: transactions.len() as u64,
            merkle_root,
            transactions,
        }
    }

    /// Builds the block that follows `self`. Fails at the last representable height.
    pub fn next(&self, transactions: Vec<Transaction>) -> Result<Self> {
        let height = self
            .height
            .checked_add(1)
            .ok_or(ChainError::HeightOverflow(self.height))?;
        Ok(Block::new(height, self.hash(), transactions))
    }

    pub fn hash(&self) -> Hash256 {
        Sha3HashProvider.block_hash(self)
    }

    /// Flat root: SHA3-256 over the concatenated transaction hashes.
    pub fn calculate_merkle_root(transactions: &[Transaction]) -> Hash256 {
        let mut concat = Vec::with_capacity(transactions.len() * 32);
        for tx in transactions {
            concat.extend_from_slice(&tx.hash());
        }
        sha3_256(&concat)
    }
}

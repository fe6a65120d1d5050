//! Canonical content hashes for transactions, proposals and blocks.
//!
//! Every correct node must compute the same digest for the same logical
//! content, so each hash is SHA3-256 over a byte string built only from
//! [`CanonicalWriter`] calls. The preimage functions are public so other
//! implementations can be checked against them byte for byte.
//!
//! Block fields are written as: height (`u64` LE), `prev_hash` (32 raw bytes),
//! `txs_number` (`u64` LE), `merkle_root` (32 raw bytes), then per transaction
//! its body, `created_ts` (`u64` LE), `tx_counter` (`u64` LE), the signature
//! count (`u64` LE) and each signature's pubkey and signature (length-prefixed).

use crate::blockchain::Block;
use crate::command::CanonicalWriter;
use crate::crypto::{sha3_256, Hash256};
use crate::transaction::{Proposal, Transaction};

pub trait HashProvider {
    fn transaction_hash(&self, tx: &Transaction) -> Hash256;
    fn proposal_hash(&self, proposal: &Proposal) -> Hash256;
    fn block_hash(&self, block: &Block) -> Hash256;
}

/// Stateless SHA3-256 provider; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha3HashProvider;

impl HashProvider for Sha3HashProvider {
    fn transaction_hash(&self, tx: &Transaction) -> Hash256 {
        sha3_256(&transaction_preimage(tx))
    }

    fn proposal_hash(&self, proposal: &Proposal) -> Hash256 {
        sha3_256(&proposal_preimage(proposal))
    }

    fn block_hash(&self, block: &Block) -> Hash256 {
        sha3_256(&block_preimage(block))
    }
}

/// Command count, commands, then creator.
pub fn transaction_preimage(tx: &Transaction) -> Vec<u8> {
    let mut writer = CanonicalWriter::new();
    tx.encode_body(&mut writer);
    writer.into_bytes()
}

/// Each transaction's commands and creator, in order. Not the transaction hashes.
pub fn proposal_preimage(proposal: &Proposal) -> Vec<u8> {
    let mut writer = CanonicalWriter::new();
    for tx in &proposal.transactions {
        tx.encode_body(&mut writer);
    }
    writer.into_bytes()
}

pub fn block_preimage(block: &Block) -> Vec<u8> {
    let mut writer = CanonicalWriter::new();
    writer.put_u64(block.height);
    writer.put_fixed(&block.prev_hash);
    writer.put_u64(block.txs_number);
    writer.put_fixed(&block.merkle_root);
    for tx in &block.transactions {
        tx.encode_body(&mut writer);
        writer.put_u64(tx.created_ts);
        writer.put_u64(tx.tx_counter);
        writer.put_u64(tx.signatures.len() as u64);
        for sig in &tx.signatures {
            writer.put_bytes(&sig.pubkey);
            writer.put_bytes(&sig.signature);
        }
    }
    writer.into_bytes()
}

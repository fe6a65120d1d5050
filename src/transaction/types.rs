/// Transaction types for PeerChain
use crate::command::{CanonicalEncode, CanonicalWriter, Command};
use crate::crypto::{verify_signature, Hash256, KeyPair};
use crate::error::{ChainError, Result};
use crate::hash::{HashProvider, Sha3HashProvider};
use serde::{Deserialize, Serialize};

/// One `{pubkey, signature}` pair attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub pubkey: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Public key of the issuing node.
    pub creator: String,
    pub commands: Vec<Command>,
    /// Milliseconds since the Unix epoch.
    pub created_ts: u64,
    /// Per-creator monotonic counter.
    pub tx_counter: u64,
    pub signatures: Vec<Signature>,
}

impl Transaction {
    pub fn new(
        creator: impl Into<String>,
        commands: Vec<Command>,
        created_ts: u64,
        tx_counter: u64,
    ) -> Self {
        Transaction {
            creator: creator.into(),
            commands,
            created_ts,
            tx_counter,
            signatures: Vec::new(),
        }
    }

    /// Command count, each command's canonical encoding, then the creator.
    ///
    /// This is the part of a transaction shared by the transaction, proposal
    /// and block hashes. The count keeps creator bytes from being read as
    /// further commands.
    pub fn encode_body(&self, writer: &mut CanonicalWriter) {
        writer.put_u64(self.commands.len() as u64);
        for command in &self.commands {
            command.encode_canonical(writer);
        }
        writer.put_str(&self.creator);
    }

    /// Bytes covered by each signature: body, timestamp and counter.
    pub fn signable_message(&self) -> Vec<u8> {
        let mut writer = CanonicalWriter::new();
        self.encode_body(&mut writer);
        writer.put_u64(self.created_ts);
        writer.put_u64(self.tx_counter);
        writer.into_bytes()
    }

    pub fn sign(&mut self, keypair: &KeyPair) -> Result<()> {
        let signature = keypair.sign(&self.signable_message())?;
        self.signatures.push(Signature {
            pubkey: keypair.public_key_bytes().to_vec(),
            signature: signature.to_vec(),
        });
        Ok(())
    }

    /// Checks every attached signature. Fails if the transaction is unsigned
    /// or none of the signers is its creator.
    pub fn verify_signatures(&self) -> Result<()> {
        if self.signatures.is_empty() {
            return Err(ChainError::Crypto("Transaction not signed".to_string()));
        }
        let signed_by_creator = self
            .signatures
            .iter()
            .any(|sig| hex::encode(&sig.pubkey).eq_ignore_ascii_case(&self.creator));
        if !signed_by_creator {
            return Err(ChainError::Crypto(format!(
                "Transaction not signed by its creator {}",
                self.creator
            )));
        }
        let message = self.signable_message();
        for sig in &self.signatures {
            verify_signature(&sig.pubkey, &message, &sig.signature)?;
        }
        Ok(())
    }

    pub fn hash(&self) -> Hash256 {
        Sha3HashProvider.transaction_hash(self)
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash())
    }
}

/// Ordered transactions proposed for one consensus round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub transactions: Vec<Transaction>,
}

impl Proposal {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Proposal { transactions }
    }

    pub fn hash(&self) -> Hash256 {
        Sha3HashProvider.proposal_hash(self)
    }
}

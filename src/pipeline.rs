//! Command pipeline: issue, validate and execute membership commands.
//!
//! - [`Issuer`] builds a signed single-command transaction and hands it to the
//!   [`Transport`]. Its pre-check is a client-side shortcut only.
//! - [`Validator`] is the side-effect-free admissibility check the consensus
//!   layer runs before a command enters an agreed block.
//! - [`Executor`] re-checks and mutates the registry after commit. Each call
//!   either fully applies or leaves the registry untouched.
//!
//! Validator and executor share one set of rules, so for the same registry
//! state they always report the same outcome.

pub mod execute;
pub mod issue;
mod rules;
pub mod validate;

pub use execute::Executor;
pub use issue::{Dispatch, Issuer};
pub use validate::{CommandRejection, Validator};

use crate::command::Command;
use crate::config::SelfIdentity;
use crate::crypto::KeyPair;
use crate::error::Result;
use crate::peer::service::PeerService;
use crate::peer::PeerRegistry;
use crate::transaction::Transaction;
use crate::transport::Transport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct CommandPipeline {
    registry: Arc<PeerRegistry>,
    transport: Arc<dyn Transport>,
    identity: SelfIdentity,
    keypair: KeyPair,
    tx_counter: AtomicU64,
}

impl CommandPipeline {
    /// Fails if the identity's private key does not match its public key.
    pub fn new(
        registry: Arc<PeerRegistry>,
        transport: Arc<dyn Transport>,
        identity: SelfIdentity,
    ) -> Result<Self> {
        let keypair = identity.keypair()?;
        Ok(CommandPipeline {
            registry,
            transport,
            identity,
            keypair,
            tx_counter: AtomicU64::new(0),
        })
    }

    pub fn from_service(service: &PeerService, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::new(
            service.registry(),
            transport,
            service.local().identity().clone(),
        )
    }

    pub fn registry(&self) -> &Arc<PeerRegistry> {
        &self.registry
    }

    pub fn identity(&self) -> &SelfIdentity {
        &self.identity
    }

    pub fn issue(&self) -> Issuer<'_> {
        Issuer::new(self)
    }

    pub fn validate(&self) -> Validator<'_> {
        Validator::new(&self.registry)
    }

    pub fn execute(&self) -> Executor<'_> {
        Executor::new(&self.registry)
    }

    /// Wraps `commands` in a transaction signed by the local identity.
    pub fn build_transaction(&self, commands: Vec<Command>) -> Result<Transaction> {
        let created_ts = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let tx_counter = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let mut tx = Transaction::new(
            self.identity.public_key.clone(),
            commands,
            created_ts,
            tx_counter,
        );
        tx.sign(&self.keypair)?;
        Ok(tx)
    }
}

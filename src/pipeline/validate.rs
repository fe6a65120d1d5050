use super::rules;
use crate::command::Command;
use crate::error::PeerError;
use crate::peer::{Node, PeerRegistry};
use crate::transaction::Transaction;
use thiserror::Error;
use tracing::warn;

/// The first command of a transaction that would not apply.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("command {index} rejected: {error}")]
pub struct CommandRejection {
    pub index: usize,
    pub error: PeerError,
}

/// Read-only admissibility checks. Never mutates the registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a PeerRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a PeerRegistry) -> Self {
        Validator { registry }
    }

    pub fn add(&self, node: &Node) -> Result<(), PeerError> {
        let result = self.registry.read(|set| rules::check_add(set, node));
        report("addPeer", result)
    }

    pub fn remove(&self, public_key: &str) -> Result<(), PeerError> {
        let result = self.registry.read(|set| rules::check_known(set, public_key));
        report("removePeer", result)
    }

    pub fn set_trust(&self, public_key: &str, value: f64) -> Result<(), PeerError> {
        let result = self
            .registry
            .read(|set| rules::check_trust_update(set, public_key, value));
        report("setTrust", result)
    }

    pub fn change_trust(&self, public_key: &str, delta: f64) -> Result<(), PeerError> {
        let result = self
            .registry
            .read(|set| rules::check_trust_update(set, public_key, delta));
        report("changeTrust", result)
    }

    pub fn set_active(&self, public_key: &str, _flag: bool) -> Result<(), PeerError> {
        let result = self.registry.read(|set| rules::check_known(set, public_key));
        report("setActive", result)
    }

    pub fn command(&self, command: &Command) -> Result<(), PeerError> {
        let result = self.registry.read(|set| rules::check(set, command));
        report(command.name(), result)
    }

    /// Dry-runs every command in order against a scratch copy of the registry,
    /// so later commands see the effect of earlier ones.
    pub fn transaction(&self, tx: &Transaction) -> Result<(), CommandRejection> {
        let mut scratch = self.registry.read(|set| set.clone());
        for (index, command) in tx.commands.iter().enumerate() {
            if let Err(error) = rules::apply(&mut scratch, command) {
                warn!(
                    "validate transaction {} from {}: {}",
                    tx.hash_str(),
                    tx.creator,
                    error
                );
                return Err(CommandRejection { index, error });
            }
        }
        Ok(())
    }
}

fn report(op: &str, result: Result<(), PeerError>) -> Result<(), PeerError> {
    if let Err(e) = &result {
        warn!("validate {}: {}", op, e);
    }
    result
}

use super::rules;
use crate::command::Command;
use crate::error::PeerError;
use crate::peer::{Node, PeerRegistry, PeerSet};
use crate::transaction::Transaction;
use tracing::{info, warn};

/// Authoritative mutations, run after consensus commits a command.
///
/// Each call re-checks its conditions under the registry's write lock, so a
/// command either applies fully or leaves the registry as it was.
#[derive(Debug, Clone, Copy)]
pub struct Executor<'a> {
    registry: &'a PeerRegistry,
}

impl<'a> Executor<'a> {
    pub fn new(registry: &'a PeerRegistry) -> Self {
        Executor { registry }
    }

    pub fn add(&self, node: &Node) -> Result<(), PeerError> {
        self.run("addPeer", &node.public_key, |set| rules::apply_add(set, node))
    }

    pub fn remove(&self, public_key: &str) -> Result<(), PeerError> {
        self.run("removePeer", public_key, |set| {
            rules::apply_remove(set, public_key)
        })
    }

    pub fn set_trust(&self, public_key: &str, value: f64) -> Result<(), PeerError> {
        self.run("setTrust", public_key, |set| {
            rules::apply_set_trust(set, public_key, value)
        })
    }

    pub fn change_trust(&self, public_key: &str, delta: f64) -> Result<(), PeerError> {
        self.run("changeTrust", public_key, |set| {
            rules::apply_change_trust(set, public_key, delta)
        })
    }

    pub fn set_active(&self, public_key: &str, flag: bool) -> Result<(), PeerError> {
        self.run("setActive", public_key, |set| {
            rules::apply_set_active(set, public_key, flag)
        })
    }

    pub fn command(&self, command: &Command) -> Result<(), PeerError> {
        self.run(command.name(), command.public_key(), |set| {
            rules::apply(set, command)
        })
    }

    /// Applies a committed transaction's commands in order, one result per
    /// command. A rejected command is skipped; the rest still run.
    ///
    /// The write lock is held across the whole transaction, so no other
    /// writer lands between two of its commands.
    pub fn transaction(&self, tx: &Transaction) -> Vec<Result<(), PeerError>> {
        self.registry.write(|set| {
            tx.commands
                .iter()
                .map(|command| {
                    let result = rules::apply(set, command);
                    report(command.name(), command.public_key(), &result);
                    result
                })
                .collect()
        })
    }

    fn run(
        &self,
        op: &str,
        public_key: &str,
        f: impl FnOnce(&mut PeerSet) -> Result<(), PeerError>,
    ) -> Result<(), PeerError> {
        let result = self.registry.write(f);
        report(op, public_key, &result);
        result
    }
}

fn report(op: &str, public_key: &str, result: &Result<(), PeerError>) {
    match result {
        Ok(()) => info!("{} applied for {}", op, public_key),
        Err(e) => warn!("{}: {}", op, e),
    }
}

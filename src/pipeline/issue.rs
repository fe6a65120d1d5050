use super::{rules, CommandPipeline};
use crate::command::Command;
use crate::crypto::Hash256;
use crate::error::{PeerError, Result};
use crate::peer::Node;
use tracing::debug;

/// What happened to an issued command.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Sent to the target; carries the transaction hash.
    Sent(Hash256),
    /// Not sent because the local pre-check already rejects it.
    Skipped(PeerError),
}

impl Dispatch {
    pub fn is_sent(&self) -> bool {
        matches!(self, Dispatch::Sent(_))
    }
}

/// Client-facing side of the pipeline.
///
/// The local pre-check only saves a round trip; the receiving node's
/// validator and executor decide.
pub struct Issuer<'a> {
    pipeline: &'a CommandPipeline,
}

impl<'a> Issuer<'a> {
    pub(super) fn new(pipeline: &'a CommandPipeline) -> Self {
        Issuer { pipeline }
    }

    pub fn add(&self, target: &str, node: Node) -> Result<Dispatch> {
        self.command(target, Command::add_peer(node))
    }

    pub fn remove(&self, target: &str, public_key: &str) -> Result<Dispatch> {
        self.command(target, Command::remove_peer(public_key))
    }

    pub fn set_trust(&self, target: &str, public_key: &str, value: f64) -> Result<Dispatch> {
        self.command(target, Command::set_trust(public_key, value))
    }

    pub fn change_trust(&self, target: &str, public_key: &str, delta: f64) -> Result<Dispatch> {
        self.command(target, Command::change_trust(public_key, delta))
    }

    pub fn set_active(&self, target: &str, public_key: &str, flag: bool) -> Result<Dispatch> {
        self.command(target, Command::set_active(public_key, flag))
    }

    /// Pre-checks `command`, then sends it to `target` in a signed transaction.
    ///
    /// The registry lock is released before the transport is called.
    pub fn command(&self, target: &str, command: Command) -> Result<Dispatch> {
        let precheck = self
            .pipeline
            .registry
            .read(|set| rules::check(set, &command));
        if let Err(e) = precheck {
            debug!("issue {} to {} skipped: {}", command.name(), target, e);
            return Ok(Dispatch::Skipped(e));
        }

        let name = command.name();
        let tx = self.pipeline.build_transaction(vec![command])?;
        let hash = tx.hash();
        self.pipeline.transport.send(target, tx);
        debug!("issue {} to {}: {}", name, target, hex::encode(hash));
        Ok(Dispatch::Sent(hash))
    }
}

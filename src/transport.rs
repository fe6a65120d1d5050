//! Outbound dispatch of issued transactions.
//!
//! The pipeline only needs fire-and-forget delivery to a named peer; framing
//! and the network itself live behind [`Transport`].

use crate::transaction::Transaction;
use tokio::sync::mpsc;
use tracing::warn;

pub trait Transport: Send + Sync {
    fn send(&self, target: &str, tx: Transaction);
}

/// A transaction queued for a peer.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub target: String,
    pub transaction: Transaction,
}

/// Hands transactions to an async consumer over an unbounded channel, so
/// `send` never blocks the caller.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<Outbound>,
}

pub type TransportReceiver = mpsc::UnboundedReceiver<Outbound>;

impl ChannelTransport {
    pub fn new() -> (Self, TransportReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ChannelTransport { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, target: &str, tx: Transaction) {
        let outbound = Outbound {
            target: target.to_string(),
            transaction: tx,
        };
        if self.sender.send(outbound).is_err() {
            warn!("Transport receiver dropped; transaction to {} discarded", target);
        }
    }
}

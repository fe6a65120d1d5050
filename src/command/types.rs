/// Command types for PeerChain
use crate::peer::Node;
use serde::{Deserialize, Serialize};

/// Tag bytes identifying each command variant in the canonical encoding.
pub mod tag {
    pub const ADD_PEER: u8 = 1;
    pub const REMOVE_PEER: u8 = 2;
    pub const SET_TRUST: u8 = 3;
    pub const CHANGE_TRUST: u8 = 4;
    pub const SET_ACTIVE: u8 = 5;
}

/// A single membership-mutating operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    AddPeer { node: Node },
    RemovePeer { public_key: String },
    SetTrust { public_key: String, value: f64 },
    ChangeTrust { public_key: String, delta: f64 },
    SetActive { public_key: String, flag: bool },
}

impl Command {
    pub fn add_peer(node: Node) -> Self {
        Command::AddPeer { node }
    }

    pub fn remove_peer(public_key: impl Into<String>) -> Self {
        Command::RemovePeer {
            public_key: public_key.into(),
        }
    }

    pub fn set_trust(public_key: impl Into<String>, value: f64) -> Self {
        Command::SetTrust {
            public_key: public_key.into(),
            value,
        }
    }

    pub fn change_trust(public_key: impl Into<String>, delta: f64) -> Self {
        Command::ChangeTrust {
            public_key: public_key.into(),
            delta,
        }
    }

    pub fn set_active(public_key: impl Into<String>, flag: bool) -> Self {
        Command::SetActive {
            public_key: public_key.into(),
            flag,
        }
    }

    /// Operation name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPeer { .. } => "addPeer",
            Command::RemovePeer { .. } => "removePeer",
            Command::SetTrust { .. } => "setTrust",
            Command::ChangeTrust { .. } => "changeTrust",
            Command::SetActive { .. } => "setActive",
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Command::AddPeer { .. } => tag::ADD_PEER,
            Command::RemovePeer { .. } => tag::REMOVE_PEER,
            Command::SetTrust { .. } => tag::SET_TRUST,
            Command::ChangeTrust { .. } => tag::CHANGE_TRUST,
            Command::SetActive { .. } => tag::SET_ACTIVE,
        }
    }

    /// Public key of the peer the command is about.
    pub fn public_key(&self) -> &str {
        match self {
            Command::AddPeer { node } => &node.public_key,
            Command::RemovePeer { public_key }
            | Command::SetTrust { public_key, .. }
            | Command::ChangeTrust { public_key, .. }
            | Command::SetActive { public_key, .. } => public_key,
        }
    }
}

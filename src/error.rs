//! Error types for PeerChain

use thiserror::Error;

/// Named conditions reported by the membership command pipeline.
///
/// These are expected outcomes, not faults: a rejected command is logged and
/// the node carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeerError {
    #[error("Duplicate peer ip: {0}")]
    DuplicateIp(String),
    #[error("Duplicate peer public key: {0}")]
    DuplicatePublicKey(String),
    #[error("Unknown peer: {0}")]
    UnknownPeer(String),
    #[error("Trust value must be finite, got {0}")]
    NonFiniteTrust(f64),
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Cryptographic error: {0}")]
    Crypto(String),
    #[error("Block height overflow after {0}")]
    HeightOverflow(u64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Peer(#[from] PeerError),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

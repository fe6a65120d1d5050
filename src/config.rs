//! Configuration management for PeerChain

use crate::crypto::KeyPair;
use crate::error::{ChainError, Result};
use crate::peer::registry::check_max_trust;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A peer listed in the static membership group.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PeerEntry {
    pub ip: String,
    pub public_key: String,
}

/// The local node's identity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SelfIdentity {
    pub ip: String,
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
}

impl SelfIdentity {
    /// Parses the signing key. Fails if it does not derive `public_key`.
    pub fn keypair(&self) -> Result<KeyPair> {
        let keypair = KeyPair::from_secret_hex(&self.private_key)?;
        if !keypair.public_key_hex().eq_ignore_ascii_case(&self.public_key) {
            return Err(ChainError::Config(format!(
                "me.private_key does not match me.public_key {}",
                self.public_key
            )));
        }
        Ok(keypair)
    }
}

/// What the membership core needs from configuration.
pub trait MembershipConfig {
    fn max_trust_score(&self) -> f64;
    fn initial_peer_list(&self) -> Vec<PeerEntry>;
    fn self_identity(&self) -> SelfIdentity;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_trust_score")]
    pub max_trust_score: f64,
    pub me: SelfIdentity,
    #[serde(default)]
    pub group: Vec<PeerEntry>,
}

impl Config {
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_max_trust(self.max_trust_score)?;
        if self.me.ip.trim().is_empty() {
            return Err(ChainError::Config("me.ip must be set".to_string()));
        }
        if self.me.public_key.trim().is_empty() {
            return Err(ChainError::Config("me.public_key must be set".to_string()));
        }
        Ok(())
    }
}

impl MembershipConfig for Config {
    fn max_trust_score(&self) -> f64 {
        self.max_trust_score
    }

    fn initial_peer_list(&self) -> Vec<PeerEntry> {
        self.group.clone()
    }

    fn self_identity(&self) -> SelfIdentity {
        self.me.clone()
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    Config::from_toml_str(&config_str)
}

fn default_max_trust_score() -> f64 {
    100.0
}

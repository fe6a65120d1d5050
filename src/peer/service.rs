//! Process-wide membership state.
//!
//! Exactly one [`PeerService`] exists per running node. It is created lazily on
//! first access and never re-seeded afterwards.

use super::registry::PeerRegistry;
use crate::config::{MembershipConfig, SelfIdentity};
use crate::error::Result;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

static SERVICE: OnceCell<PeerService> = OnceCell::new();

/// The local node: its identity and whether it currently takes part in consensus.
#[derive(Debug)]
pub struct LocalPeer {
    identity: SelfIdentity,
    active: AtomicBool,
}

impl LocalPeer {
    pub fn new(identity: SelfIdentity) -> Self {
        LocalPeer {
            identity,
            active: AtomicBool::new(false),
        }
    }

    pub fn identity(&self) -> &SelfIdentity {
        &self.identity
    }

    pub fn ip(&self) -> &str {
        &self.identity.ip
    }

    pub fn public_key(&self) -> &str {
        &self.identity.public_key
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// True iff the current leader has this node's ip and public key.
    pub fn is_leader(&self, registry: &PeerRegistry) -> bool {
        registry.is_leader(&self.identity.ip, &self.identity.public_key)
    }
}

#[derive(Debug)]
pub struct PeerService {
    registry: Arc<PeerRegistry>,
    local: LocalPeer,
}

impl PeerService {
    /// Builds a seeded service with the local node marked inactive.
    pub fn new(config: &impl MembershipConfig) -> Result<Self> {
        let registry = Arc::new(PeerRegistry::from_config(config)?);
        let local = LocalPeer::new(config.self_identity());
        info!(
            "Peer service ready for {} ({})",
            local.public_key(),
            local.ip()
        );
        Ok(PeerService { registry, local })
    }

    pub fn registry(&self) -> Arc<PeerRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn local(&self) -> &LocalPeer {
        &self.local
    }

    pub fn is_leader(&self) -> bool {
        self.local.is_leader(&self.registry)
    }
}

/// Returns the process-wide service, creating it from `config` on first call.
///
/// Later calls ignore `config` and return the existing instance. A failed
/// first call leaves the service uninitialized.
pub fn instance(config: &impl MembershipConfig) -> Result<&'static PeerService> {
    SERVICE.get_or_try_init(|| PeerService::new(config))
}

/// The process-wide service, if [`instance`] has been called.
pub fn get() -> Option<&'static PeerService> {
    SERVICE.get()
}

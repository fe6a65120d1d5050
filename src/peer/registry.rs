//! Peer registry
//!
//! Owns every known [`Node`]. Reads hand out snapshots; all mutation goes
//! through the command pipeline's executor, which takes the write lock for the
//! whole check-then-mutate step.

use super::node::{election_order, Node};
use crate::config::MembershipConfig;
use crate::error::{ChainError, Result};
use parking_lot::RwLock;
use tracing::{info, warn};

/// The unlocked membership set. Insertion order is preserved.
///
/// Invariant: no two nodes share an `ip` or a `public_key`.
#[derive(Debug, Clone)]
pub struct PeerSet {
    nodes: Vec<Node>,
    max_trust: f64,
}

impl PeerSet {
    pub fn new(max_trust: f64) -> Self {
        PeerSet {
            nodes: Vec::new(),
            max_trust,
        }
    }

    pub fn max_trust(&self) -> f64 {
        self.max_trust
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn exists_by_ip(&self, ip: &str) -> bool {
        self.find_by_ip(ip).is_some()
    }

    pub fn exists_by_public_key(&self, public_key: &str) -> bool {
        self.find_by_public_key(public_key).is_some()
    }

    pub fn find_by_ip(&self, ip: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.ip == ip)
    }

    pub fn find_by_public_key(&self, public_key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.public_key == public_key)
    }

    /// Active nodes in election order.
    pub fn active_peers(&self) -> Vec<Node> {
        let mut active: Vec<Node> = self.nodes.iter().filter(|n| n.active).cloned().collect();
        active.sort_by(election_order);
        active
    }

    pub fn clamp_trust(&self, trust: f64) -> f64 {
        clamp_trust(trust, self.max_trust)
    }

    /// Exclusive handle to a node; the only way a node's fields change.
    pub(crate) fn find_by_public_key_mut(&mut self, public_key: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.public_key == public_key)
    }

    /// Appends a node. Callers must have checked both uniqueness keys.
    pub(crate) fn insert(&mut self, node: Node) {
        debug_assert!(!self.exists_by_ip(&node.ip));
        debug_assert!(!self.exists_by_public_key(&node.public_key));
        self.nodes.push(node);
    }

    pub(crate) fn remove(&mut self, public_key: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.public_key == public_key)?;
        Some(self.nodes.remove(index))
    }

    fn set_max_trust(&mut self, max_trust: f64) {
        self.max_trust = max_trust;
    }
}

/// Clamps a trust value into `[0, max_trust]`. Negative zero becomes zero.
///
/// A NaN or negative ceiling clamps everything to zero.
pub fn clamp_trust(trust: f64, max_trust: f64) -> f64 {
    let ceiling = if max_trust > 0.0 { max_trust } else { 0.0 };
    let clamped = trust.max(0.0).min(ceiling);
    if clamped == 0.0 {
        0.0
    } else {
        clamped
    }
}

/// Accepts a trust ceiling only if it is a positive finite number.
pub fn check_max_trust(max_trust: f64) -> Result<f64> {
    if max_trust.is_finite() && max_trust > 0.0 {
        Ok(max_trust)
    } else {
        Err(ChainError::Config(format!(
            "max_trust_score must be a positive finite number, got {}",
            max_trust
        )))
    }
}

/// Thread-safe registry. A single lock serializes mutations against each other
/// and against snapshot reads.
#[derive(Debug)]
pub struct PeerRegistry {
    inner: RwLock<PeerSet>,
}

impl PeerRegistry {
    /// Creates an empty registry. See [`clamp_trust`] for how an invalid
    /// ceiling behaves; [`PeerRegistry::try_new`] rejects one instead.
    pub fn new(max_trust: f64) -> Self {
        PeerRegistry {
            inner: RwLock::new(PeerSet::new(max_trust)),
        }
    }

    pub fn try_new(max_trust: f64) -> Result<Self> {
        Ok(PeerRegistry::new(check_max_trust(max_trust)?))
    }

    /// Creates a registry already seeded from `config`.
    pub fn from_config(config: &impl MembershipConfig) -> Result<Self> {
        let registry = PeerRegistry::try_new(config.max_trust_score())?;
        registry.initialize_once(config)?;
        Ok(registry)
    }

    /// Seeds the registry from the static peer list, once.
    ///
    /// Returns `Ok(false)` without touching anything if the registry already
    /// holds peers. Seeded peers start active at the configured maximum trust.
    pub fn initialize_once(&self, config: &impl MembershipConfig) -> Result<bool> {
        let mut set = self.inner.write();
        if !set.is_empty() {
            return Ok(false);
        }

        set.set_max_trust(check_max_trust(config.max_trust_score())?);
        let trust = set.max_trust();
        for entry in config.initial_peer_list() {
            if set.exists_by_ip(&entry.ip) || set.exists_by_public_key(&entry.public_key) {
                warn!(
                    "Skipping duplicate peer {} ({}) in configured group",
                    entry.public_key, entry.ip
                );
                continue;
            }
            set.insert(Node::new(entry.ip, entry.public_key, trust).with_active(true));
        }

        info!("Peer registry initialized with {} peers", set.len());
        Ok(true)
    }

    pub fn max_trust(&self) -> f64 {
        self.inner.read().max_trust()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Full membership snapshot in insertion order.
    pub fn all_peers(&self) -> Vec<Node> {
        self.inner.read().iter().cloned().collect()
    }

    /// Active nodes sorted by trust descending, ties broken by public key then ip.
    pub fn active_peers(&self) -> Vec<Node> {
        self.inner.read().active_peers()
    }

    pub fn leader(&self) -> Option<Node> {
        self.active_peers().into_iter().next()
    }

    pub fn is_leader(&self, ip: &str, public_key: &str) -> bool {
        self.leader().is_some_and(|leader| leader.is(ip, public_key))
    }

    /// Maximum number of Byzantine nodes the active set tolerates (n >= 3f + 1).
    pub fn quorum_fault_tolerance(&self) -> usize {
        self.inner.read().active_peers().len().saturating_sub(1) / 3
    }

    /// IPs of the active peers in election order.
    pub fn ip_list(&self) -> Vec<String> {
        self.active_peers().into_iter().map(|n| n.ip).collect()
    }

    pub fn exists_by_ip(&self, ip: &str) -> bool {
        self.inner.read().exists_by_ip(ip)
    }

    pub fn exists_by_public_key(&self, public_key: &str) -> bool {
        self.inner.read().exists_by_public_key(public_key)
    }

    pub fn peer(&self, public_key: &str) -> Option<Node> {
        self.inner.read().find_by_public_key(public_key).cloned()
    }

    pub fn peer_by_ip(&self, ip: &str) -> Option<Node> {
        self.inner.read().find_by_ip(ip).cloned()
    }

    /// Runs `f` against a consistent view of the set.
    pub fn read<R>(&self, f: impl FnOnce(&PeerSet) -> R) -> R {
        let set = self.inner.read();
        f(&set)
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut PeerSet) -> R) -> R {
        let mut set = self.inner.write();
        f(&mut set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PeerEntry, SelfIdentity};

    struct StaticConfig {
        max_trust: f64,
        group: Vec<PeerEntry>,
    }

    impl MembershipConfig for StaticConfig {
        fn max_trust_score(&self) -> f64 {
            self.max_trust
        }

        fn initial_peer_list(&self) -> Vec<PeerEntry> {
            self.group.clone()
        }

        fn self_identity(&self) -> SelfIdentity {
            SelfIdentity {
                ip: "10.0.0.1".to_string(),
                public_key: "pkA".to_string(),
                private_key: String::new(),
            }
        }
    }

    fn entry(ip: &str, public_key: &str) -> PeerEntry {
        PeerEntry {
            ip: ip.to_string(),
            public_key: public_key.to_string(),
        }
    }

    fn registry_with(nodes: Vec<Node>) -> PeerRegistry {
        let registry = PeerRegistry::new(100.0);
        registry.write(|set| nodes.into_iter().for_each(|n| set.insert(n)));
        registry
    }

    #[test]
    fn test_initialize_once_seeds_only_empty_registry() {
        let config = StaticConfig {
            max_trust: 80.0,
            group: vec![entry("10.0.0.1", "pkA"), entry("10.0.0.2", "pkB")],
        };
        let registry = PeerRegistry::new(1.0);

        assert!(registry.initialize_once(&config).unwrap());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.max_trust(), 80.0);
        assert!(registry.all_peers().iter().all(|n| n.trust == 80.0 && n.active));

        let again = StaticConfig {
            max_trust: 10.0,
            group: vec![entry("10.0.0.3", "pkC")],
        };
        assert!(!registry.initialize_once(&again).unwrap());
        assert_eq!(registry.len(), 2);
        assert!(!registry.exists_by_public_key("pkC"));
    }

    #[test]
    fn test_initialize_skips_duplicate_entries() {
        let config = StaticConfig {
            max_trust: 100.0,
            group: vec![
                entry("10.0.0.1", "pkA"),
                entry("10.0.0.1", "pkB"),
                entry("10.0.0.2", "pkA"),
                entry("10.0.0.3", "pkC"),
            ],
        };
        let registry = PeerRegistry::from_config(&config).unwrap();
        let keys: Vec<String> = registry.all_peers().into_iter().map(|n| n.public_key).collect();
        assert_eq!(keys, vec!["pkA", "pkC"]);
    }

    #[test]
    fn test_active_peers_sorted_with_tie_break() {
        let registry = registry_with(vec![
            Node::new("10.0.0.1", "pkC", 50.0).with_active(true),
            Node::new("10.0.0.2", "pkA", 50.0).with_active(true),
            Node::new("10.0.0.3", "pkB", 90.0).with_active(true),
            Node::new("10.0.0.4", "pkD", 99.0),
        ]);

        let keys: Vec<String> = registry.active_peers().into_iter().map(|n| n.public_key).collect();
        assert_eq!(keys, vec!["pkB", "pkA", "pkC"]);
        assert_eq!(registry.ip_list(), vec!["10.0.0.3", "10.0.0.2", "10.0.0.1"]);
        assert!(registry.is_leader("10.0.0.3", "pkB"));
        assert!(!registry.is_leader("10.0.0.9", "pkB"));
    }

    #[test]
    fn test_all_peers_keeps_insertion_order() {
        let registry = registry_with(vec![
            Node::new("10.0.0.2", "pkB", 1.0),
            Node::new("10.0.0.1", "pkA", 2.0),
        ]);
        let ips: Vec<String> = registry.all_peers().into_iter().map(|n| n.ip).collect();
        assert_eq!(ips, vec!["10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn test_leader_absent_without_active_peers() {
        let registry = registry_with(vec![Node::new("10.0.0.1", "pkA", 100.0)]);
        assert!(registry.leader().is_none());
        assert!(!registry.is_leader("10.0.0.1", "pkA"));
        assert_eq!(registry.quorum_fault_tolerance(), 0);
    }

    #[test]
    fn test_quorum_fault_tolerance_table() {
        for (size, expected) in [(0, 0), (1, 0), (2, 0), (3, 0), (4, 1), (7, 2), (10, 3)] {
            let nodes = (0..size)
                .map(|i| Node::new(format!("10.0.0.{}", i), format!("pk{}", i), 1.0).with_active(true))
                .collect();
            assert_eq!(registry_with(nodes).quorum_fault_tolerance(), expected, "n = {}", size);
        }
    }

    #[test]
    fn test_find_by_public_key_mut_updates_in_place() {
        let registry = registry_with(vec![Node::new("10.0.0.1", "pkA", 10.0)]);
        let found = registry.write(|set| {
            set.find_by_public_key_mut("pkA").map(|n| n.active = true).is_some()
        });
        assert!(found);
        assert!(registry.peer("pkA").unwrap().active);
        assert!(registry.write(|set| set.find_by_public_key_mut("pkZ").is_none()));
    }

    #[test]
    fn test_remove_by_public_key() {
        let registry = registry_with(vec![
            Node::new("10.0.0.1", "pkA", 10.0),
            Node::new("10.0.0.2", "pkB", 10.0),
        ]);
        let removed = registry.write(|set| set.remove("pkA"));
        assert_eq!(removed.map(|n| n.ip), Some("10.0.0.1".to_string()));
        assert!(registry.write(|set| set.remove("pkA")).is_none());
        assert_eq!(registry.peer_by_ip("10.0.0.2").map(|n| n.public_key), Some("pkB".to_string()));
    }

    #[test]
    fn test_clamp_trust() {
        let set = PeerSet::new(100.0);
        assert_eq!(set.clamp_trust(150.0), 100.0);
        assert_eq!(set.clamp_trust(-5.0), 0.0);
        assert_eq!(set.clamp_trust(42.5), 42.5);
        assert!(set.clamp_trust(-0.0).is_sign_positive());
    }

    #[test]
    fn test_invalid_ceiling_clamps_to_zero() {
        for max_trust in [f64::NAN, -1.0, 0.0] {
            assert_eq!(clamp_trust(50.0, max_trust), 0.0);
            assert!(clamp_trust(-3.0, max_trust).is_sign_positive());
        }
        assert_eq!(clamp_trust(1e300, f64::INFINITY), 1e300);
    }

    #[test]
    fn test_rejects_invalid_ceiling() {
        for max_trust in [f64::NAN, f64::INFINITY, -1.0, 0.0] {
            assert!(PeerRegistry::try_new(max_trust).is_err());

            let config = StaticConfig {
                max_trust,
                group: vec![entry("10.0.0.1", "pkA")],
            };
            assert!(PeerRegistry::from_config(&config).is_err());

            let registry = PeerRegistry::new(100.0);
            assert!(registry.initialize_once(&config).is_err());
            assert!(registry.is_empty());
            assert_eq!(registry.max_trust(), 100.0);
        }
        assert!(PeerRegistry::try_new(100.0).is_ok());
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One registry member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub ip: String,
    /// Durable identity of the node.
    pub public_key: String,
    pub trust: f64,
    /// Only active nodes take part in leader election and quorum sizing.
    pub active: bool,
}

impl Node {
    /// A new, inactive node. Joining peers are activated by a later `SetActive`.
    pub fn new(ip: impl Into<String>, public_key: impl Into<String>, trust: f64) -> Self {
        Node {
            ip: ip.into(),
            public_key: public_key.into(),
            trust,
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// True if this node is the one identified by `ip` and `public_key`.
    pub fn is(&self, ip: &str, public_key: &str) -> bool {
        self.ip == ip && self.public_key == public_key
    }
}

/// Leader election order: trust descending, then public key ascending, then ip ascending.
///
/// `total_cmp` keeps the order total even for values that slipped past validation.
pub fn election_order(a: &Node, b: &Node) -> Ordering {
    b.trust
        .total_cmp(&a.trust)
        .then_with(|| a.public_key.as_bytes().cmp(b.public_key.as_bytes()))
        .then_with(|| a.ip.as_bytes().cmp(b.ip.as_bytes()))
}

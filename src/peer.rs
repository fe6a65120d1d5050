//! Peer membership: nodes, the registry that owns them, and the
//! process-wide service instance.

pub mod node;
pub mod registry;
pub mod service;

pub use node::Node;
pub use registry::{PeerRegistry, PeerSet};

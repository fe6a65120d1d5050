//! PeerChain - membership and state-integrity core of a permissioned ledger
//!
//! # Architecture
//!
//! ## Membership
//! - [`peer`] - Nodes, the peer registry, leader and quorum derivation
//! - [`pipeline`] - Issue / validate / execute lifecycle for membership commands
//! - [`command`] - Membership commands and their canonical encoding
//!
//! ## Ledger Values
//! - [`transaction`] - Transactions and proposals
//! - [`blockchain`] - Block structure
//! - [`hash`] - Canonical SHA3-256 hashes of transactions, proposals and blocks
//!
//! ## Collaborators
//! - [`transport`] - Outbound dispatch of issued transactions
//! - [`crypto`] - Digests and secp256k1 signatures
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Membership
// ============================================================================
pub mod command;
pub mod peer;
pub mod pipeline;

// ============================================================================
// Ledger Values
// ============================================================================
pub mod blockchain;
pub mod hash;
pub mod transaction;

// ============================================================================
// Collaborators
// ============================================================================
pub mod crypto;
pub mod transport;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

//! Transactions and proposals carrying membership commands

pub mod types;

pub use types::*;

// Thin re-export module: the block type lives in `blockchain/block.rs`.

pub mod block;
pub use block::*;

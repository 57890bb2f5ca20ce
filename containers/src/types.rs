pub use alloy_primitives::{Address, Bytes};

/// 32-byte keccak digest identifying blocks, state roots and trie nodes.
pub type Hash = alloy_primitives::B256;

pub type BlockNumber = u64;

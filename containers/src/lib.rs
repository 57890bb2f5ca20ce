pub mod types;
pub mod block;

pub use block::BlockHeader;
pub use types::{Address, BlockNumber, Bytes, Hash};

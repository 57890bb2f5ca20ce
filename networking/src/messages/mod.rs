//! eth wire messages consumed by the sync pipeline.
//!
//! Every message travels inside a `(code, payload)` envelope owned by the
//! transport. The types here own the payload format only: a [`RawMessage`]
//! received from a peer is reinterpreted as a specific message once its code
//! has been checked.
pub mod codes;
mod error;
mod list;
pub mod new_block_hashes;
pub mod node_data;
mod raw;

pub use error::MessageError;
pub use list::{ListReader, RlpListIter};
pub use new_block_hashes::{NewBlockHash, NewBlockHashesMessage};
pub use node_data::NodeDataMessage;
pub use raw::{MessageData, RawMessage};

use containers::Bytes;

use super::{
    MessageData, MessageError, RawMessage,
    codes::eth_pv63,
    list::{ListReader, RlpListIter, encode_list},
    raw::ensure_code,
};

/// eth/63 `NodeData`: serialized trie, account and bytecode nodes.
///
/// Wire layout: `[node, ...]` where each node is an opaque byte string. The
/// list length is the only count carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDataMessage {
    data: Bytes,
}

impl NodeDataMessage {
    pub fn create<I, B>(nodes: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let nodes = nodes.into_iter().collect::<Vec<_>>();
        Self {
            data: encode_list(nodes.iter().map(AsRef::<[u8]>::as_ref)),
        }
    }

    /// Reinterprets a generic message, failing if its code is not `NODE_DATA`.
    pub fn read_from<M: MessageData + ?Sized>(message: &M) -> Result<Self, MessageError> {
        ensure_code(message, eth_pv63::NODE_DATA)?;
        Ok(Self {
            data: message.data().clone(),
        })
    }

    pub fn iter_node_data(&self) -> Result<RlpListIter<'_, Bytes>, MessageError> {
        Ok(RlpListIter::new(ListReader::open(&self.data)?))
    }

    /// All nodes in wire order. Zero-length nodes are kept.
    pub fn node_data(&self) -> Result<Vec<Bytes>, MessageError> {
        self.iter_node_data()?.collect()
    }
}

impl MessageData for NodeDataMessage {
    fn code(&self) -> u32 {
        eth_pv63::NODE_DATA
    }

    fn data(&self) -> &Bytes {
        &self.data
    }
}

impl TryFrom<RawMessage> for NodeDataMessage {
    type Error = MessageError;

    fn try_from(message: RawMessage) -> Result<Self, Self::Error> {
        Self::read_from(&message)
    }
}

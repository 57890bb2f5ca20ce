/// Message codes introduced by eth/62.
pub mod eth_pv62 {
    pub const STATUS: u32 = 0x00;
    pub const NEW_BLOCK_HASHES: u32 = 0x01;
    pub const TRANSACTIONS: u32 = 0x02;
    pub const GET_BLOCK_HEADERS: u32 = 0x03;
    pub const BLOCK_HEADERS: u32 = 0x04;
    pub const GET_BLOCK_BODIES: u32 = 0x05;
    pub const BLOCK_BODIES: u32 = 0x06;
    pub const NEW_BLOCK: u32 = 0x07;
}

/// Message codes introduced by eth/63 on top of eth/62.
pub mod eth_pv63 {
    pub use super::eth_pv62::*;

    pub const GET_NODE_DATA: u32 = 0x0d;
    pub const NODE_DATA: u32 = 0x0e;
    pub const GET_RECEIPTS: u32 = 0x0f;
    pub const RECEIPTS: u32 = 0x10;
}

/// Human readable name of an eth/63 message code.
pub fn message_name(code: u32) -> Option<&'static str> {
    use eth_pv63::*;

    let name = match code {
        STATUS => "Status",
        NEW_BLOCK_HASHES => "NewBlockHashes",
        TRANSACTIONS => "Transactions",
        GET_BLOCK_HEADERS => "GetBlockHeaders",
        BLOCK_HEADERS => "BlockHeaders",
        GET_BLOCK_BODIES => "GetBlockBodies",
        BLOCK_BODIES => "BlockBodies",
        NEW_BLOCK => "NewBlock",
        GET_NODE_DATA => "GetNodeData",
        NODE_DATA => "NodeData",
        GET_RECEIPTS => "GetReceipts",
        RECEIPTS => "Receipts",
        _ => return None,
    };
    Some(name)
}

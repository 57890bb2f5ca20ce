use crate::{Address, BlockNumber, Bytes, Hash};
use alloy_primitives::keccak256;
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// Execution block header as exchanged between peers during sync.
///
/// Only the fields the sync pipeline reads are carried. The block hash is the
/// keccak-256 digest of the RLP encoding of the whole header.
#[derive(
    Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, RlpEncodable, RlpDecodable,
)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub parent_hash: Hash,
    pub ommers_hash: Hash,
    pub beneficiary: Address,
    /// Root of the world state trie after this block. Snap/fast sync downloads
    /// the state under this root when the header is the pivot.
    pub state_root: Hash,
    pub transactions_root: Hash,
    pub receipts_root: Hash,
    pub number: BlockNumber,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Bytes,
}

impl BlockHeader {
    pub fn hash(&self) -> Hash {
        keccak256(alloy_rlp::encode(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_rlp::Decodable;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn header(number: u64) -> BlockHeader {
        BlockHeader {
            number,
            state_root: Hash::repeat_byte(0xab),
            gas_limit: 30_000_000,
            timestamp: 1_700_000_000,
            extra_data: Bytes::from_static(b"snap"),
            ..Default::default()
        }
    }

    #[test]
    fn test_rlp_decode_restores_header() {
        let original = header(1060);
        let encoded = alloy_rlp::encode(&original);

        let decoded = BlockHeader::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, original);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(939, 1060)]
    fn test_hash_depends_on_number(#[case] a: u64, #[case] b: u64) {
        assert_ne!(header(a).hash(), header(b).hash());
        assert_eq!(header(a).hash(), header(a).hash());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(header(5)).unwrap();

        assert_eq!(json["number"], 5);
        assert!(json.get("stateRoot").is_some());
        assert!(json.get("state_root").is_none());
        assert_eq!(
            json["extraData"].as_str().unwrap(),
            format!("0x{}", hex::encode(b"snap"))
        );
    }
}

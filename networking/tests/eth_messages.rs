use containers::{Bytes, Hash};
use networking::messages::{
    MessageData, MessageError, NewBlockHash, NewBlockHashesMessage, NodeDataMessage, RawMessage,
    codes::{eth_pv62, eth_pv63},
};
use pretty_assertions::assert_eq;
use rand::Rng;
use rstest::rstest;

fn announced(number: u64) -> NewBlockHash {
    NewBlockHash::new(Hash::repeat_byte((number % 256) as u8), number)
}

/// Wraps already encoded items into a list payload.
fn list_payload(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_length = items.iter().map(|item| item.len()).sum();
    let mut out = Vec::new();
    alloy_rlp::Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn new_block_hashes(payload: Vec<u8>) -> NewBlockHashesMessage {
    NewBlockHashesMessage::try_from(RawMessage::new(eth_pv62::NEW_BLOCK_HASHES, payload)).unwrap()
}

#[rstest]
#[case::empty(vec![])]
#[case::single(vec![announced(1060)])]
#[case::several(vec![announced(1040), announced(1066), announced(1050)])]
fn test_new_block_hashes_preserve_order(#[case] hashes: Vec<NewBlockHash>) {
    let message = NewBlockHashesMessage::create(&hashes);
    assert_eq!(message.code(), eth_pv62::NEW_BLOCK_HASHES);

    let raw = RawMessage::from_message(&message);
    let decoded = NewBlockHashesMessage::read_from(&raw).unwrap();
    let decoded = decoded
        .new_hashes()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(decoded, hashes);
}

#[test]
fn test_new_block_hashes_highest() {
    let message = NewBlockHashesMessage::create(&[announced(5), announced(9), announced(7)]);
    assert_eq!(message.highest().unwrap(), Some(announced(9)));

    let empty = NewBlockHashesMessage::create(&[]);
    assert_eq!(empty.highest().unwrap(), None);
    assert_eq!(empty.size(), 1);
}

#[test]
fn test_node_data_round_trip_random_nodes() {
    let mut rng = rand::thread_rng();
    let nodes = (0..20)
        .map(|_| {
            let mut node = vec![0u8; rng.gen_range(0..64)];
            rng.fill(&mut node[..]);
            Bytes::from(node)
        })
        .collect::<Vec<_>>();

    let message = NodeDataMessage::create(&nodes);
    assert_eq!(message.code(), eth_pv63::NODE_DATA);

    let raw = RawMessage::new(message.code(), message.data().clone());
    let decoded = NodeDataMessage::try_from(raw).unwrap();

    assert_eq!(decoded.node_data().unwrap(), nodes);
}

#[rstest]
#[case::empty(vec![])]
#[case::zero_length_nodes(vec![vec![], vec![0x01], vec![]])]
#[case::single_low_byte(vec![vec![0x7f]])]
#[case::long_node(vec![vec![0xaa; 300]])]
fn test_node_data_keeps_every_node(#[case] nodes: Vec<Vec<u8>>) {
    let message = NodeDataMessage::create(&nodes);

    let decoded = message.node_data().unwrap();

    assert_eq!(decoded.len(), nodes.len());
    for (decoded, node) in decoded.iter().zip(&nodes) {
        assert_eq!(decoded.as_ref(), node.as_slice());
    }
}

#[test]
fn test_read_from_rejects_other_codes() {
    let node_data = NodeDataMessage::create([b"node".as_slice()]);
    let raw = RawMessage::from_message(&node_data);

    let err = NewBlockHashesMessage::read_from(&raw).unwrap_err();
    assert_eq!(
        err,
        MessageError::CodeMismatch {
            expected: eth_pv62::NEW_BLOCK_HASHES,
            actual: eth_pv63::NODE_DATA,
        }
    );
    assert_eq!(
        err.to_string(),
        "message has code 0x0e and thus is not a NewBlockHashes message"
    );

    let hashes = NewBlockHashesMessage::create(&[announced(1)]);
    assert!(matches!(
        NodeDataMessage::read_from(&hashes),
        Err(MessageError::CodeMismatch { .. })
    ));
}

#[test]
fn test_read_from_same_code_keeps_payload() {
    let message = NodeDataMessage::create([b"a".as_slice(), b"bc".as_slice()]);

    let reread = NodeDataMessage::read_from(&message).unwrap();

    assert_eq!(reread, message);
}

#[rstest]
#[case::short_hash(alloy_rlp::encode([0x11u8; 31].as_slice()), alloy_rlp::encode(1060u64))]
#[case::long_hash(alloy_rlp::encode([0x11u8; 33].as_slice()), alloy_rlp::encode(1060u64))]
#[case::number_with_leading_zero(alloy_rlp::encode(Hash::repeat_byte(0x11)), vec![0x82, 0x00, 0x05])]
#[case::number_as_list(alloy_rlp::encode(Hash::repeat_byte(0x11)), vec![0xc1, 0x05])]
fn test_malformed_pair_is_rejected(#[case] hash: Vec<u8>, #[case] number: Vec<u8>) {
    let pair = list_payload(&[hash, number]);

    let message = new_block_hashes(list_payload(&[pair]));
    let mut hashes = message.new_hashes().unwrap();

    assert!(matches!(hashes.next(), Some(Err(MessageError::Rlp(_)))));
    assert!(hashes.next().is_none());
}

#[test]
fn test_well_formed_pair_is_accepted() {
    let pair = list_payload(&[
        alloy_rlp::encode(Hash::repeat_byte(0x11)),
        vec![0x82, 0x01, 0x05],
    ]);

    let message = new_block_hashes(list_payload(&[pair]));

    assert_eq!(
        message.highest(),
        Ok(Some(NewBlockHash::new(Hash::repeat_byte(0x11), 0x0105)))
    );
}

#[test]
fn test_pair_with_extra_field_is_rejected() {
    let triple = list_payload(&[
        alloy_rlp::encode(Hash::repeat_byte(0x22)),
        alloy_rlp::encode(7u64),
        alloy_rlp::encode(8u64),
    ]);

    let message = new_block_hashes(list_payload(&[triple]));

    assert!(message.highest().is_err());
}

#[test]
fn test_scalar_instead_of_pair_is_rejected() {
    let message = new_block_hashes(list_payload(&[vec![0x05]]));

    assert!(matches!(
        message.new_hashes().unwrap().next(),
        Some(Err(MessageError::Rlp(alloy_rlp::Error::UnexpectedString)))
    ));
}

#[test]
fn test_payload_that_is_not_a_list_is_rejected() {
    let message = new_block_hashes(alloy_rlp::encode(42u64));

    assert!(matches!(
        message.new_hashes(),
        Err(MessageError::Rlp(alloy_rlp::Error::UnexpectedString))
    ));
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut payload = NewBlockHashesMessage::create(&[announced(3)]).data().to_vec();
    payload.push(0x80);

    let message = new_block_hashes(payload);

    assert!(matches!(
        message.new_hashes(),
        Err(MessageError::TrailingBytes(1))
    ));

    let mut node_payload = NodeDataMessage::create([b"x".as_slice()]).data().to_vec();
    node_payload.extend_from_slice(&[0xc0, 0xc0]);
    let node_data =
        NodeDataMessage::try_from(RawMessage::new(eth_pv63::NODE_DATA, node_payload)).unwrap();
    assert_eq!(node_data.node_data(), Err(MessageError::TrailingBytes(2)));
}

#[test]
fn test_items_before_a_bad_element_are_still_yielded() {
    let good = alloy_rlp::encode(announced(10));
    let message = new_block_hashes(list_payload(&[good, vec![0x05]]));

    let mut hashes = message.new_hashes().unwrap();

    assert_eq!(hashes.next(), Some(Ok(announced(10))));
    assert!(matches!(hashes.next(), Some(Err(_))));
    assert_eq!(hashes.next(), None);
}

#[test]
fn test_node_data_rejects_nested_list() {
    let nested = list_payload(&[vec![0x01]]);
    let payload = list_payload(&[alloy_rlp::encode(b"ok".as_slice()), nested]);
    let message =
        NodeDataMessage::try_from(RawMessage::new(eth_pv63::NODE_DATA, payload)).unwrap();

    let mut nodes = message.iter_node_data().unwrap();
    assert_eq!(nodes.next(), Some(Ok(Bytes::from_static(b"ok"))));
    assert!(matches!(nodes.next(), Some(Err(MessageError::Rlp(_)))));
    assert!(message.node_data().is_err());
}

#[test]
fn test_display() {
    let hash = announced(1060);
    assert_eq!(hash.to_string(), format!("New Block Hash [1060: {}]", hash.hash));

    let message = NewBlockHashesMessage::create(&[announced(1), announced(2)]);
    let rendered = message.to_string();
    assert!(rendered.starts_with("NewBlockHashesMessage: [New Block Hash [1: "));
    assert!(rendered.contains(", New Block Hash [2: "));
    assert!(rendered.ends_with("]]"));
}

#[test]
fn test_wire_vectors() {
    let node_data = NodeDataMessage::create([b"abc".as_slice()]);
    assert_eq!(hex::encode(node_data.data()), "c483616263");

    let payload = hex::decode(format!("e3e2a0{}01", "00".repeat(32))).unwrap();
    let message = new_block_hashes(payload);
    assert_eq!(
        message.new_hashes().unwrap().collect::<Result<Vec<_>, _>>(),
        Ok(vec![NewBlockHash::new(Hash::ZERO, 1)])
    );
}

use std::fmt;

use alloy_rlp::{Decodable, RlpEncodable};
use containers::{BlockNumber, Bytes, Hash};

use super::{
    MessageData, MessageError, RawMessage,
    codes::eth_pv62,
    list::{ListReader, RlpListIter, encode_list},
    raw::ensure_code,
};

/// A `(hash, number)` pair announced by a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, RlpEncodable)]
pub struct NewBlockHash {
    pub hash: Hash,
    pub number: BlockNumber,
}

impl NewBlockHash {
    pub fn new(hash: Hash, number: BlockNumber) -> Self {
        Self { hash, number }
    }
}

impl Decodable for NewBlockHash {
    /// Accepts exactly `[32-byte string, scalar]`.
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let mut fields = ListReader::enter(buf)?;
        let hash = fields.read::<Hash>()?;
        let number = fields.read::<BlockNumber>()?;
        fields.finish()?;
        Ok(Self { hash, number })
    }
}

impl fmt::Display for NewBlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "New Block Hash [{}: {}]", self.number, self.hash)
    }
}

/// eth/62 `NewBlockHashes`: chain-head announcements from a peer.
///
/// Wire layout: `[[hash, number], ...]`, in announcement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlockHashesMessage {
    data: Bytes,
}

impl NewBlockHashesMessage {
    pub fn create(hashes: &[NewBlockHash]) -> Self {
        Self {
            data: encode_list(hashes),
        }
    }

    /// Reinterprets a generic message, failing if its code is not `NEW_BLOCK_HASHES`.
    ///
    /// The payload is not inspected here; malformed content surfaces from
    /// [`Self::new_hashes`].
    pub fn read_from<M: MessageData + ?Sized>(message: &M) -> Result<Self, MessageError> {
        ensure_code(message, eth_pv62::NEW_BLOCK_HASHES)?;
        Ok(Self {
            data: message.data().clone(),
        })
    }

    /// Announced pairs, decoded one at a time.
    ///
    /// Fails up front if the payload is not a single list. Each element is
    /// decoded only when the iterator reaches it.
    pub fn new_hashes(&self) -> Result<RlpListIter<'_, NewBlockHash>, MessageError> {
        Ok(RlpListIter::new(ListReader::open(&self.data)?))
    }

    /// Highest announced block number, if the message decodes cleanly.
    pub fn highest(&self) -> Result<Option<NewBlockHash>, MessageError> {
        let mut highest: Option<NewBlockHash> = None;
        for announced in self.new_hashes()? {
            let announced = announced?;
            if highest.is_none_or(|h| announced.number > h.number) {
                highest = Some(announced);
            }
        }
        Ok(highest)
    }
}

impl MessageData for NewBlockHashesMessage {
    fn code(&self) -> u32 {
        eth_pv62::NEW_BLOCK_HASHES
    }

    fn data(&self) -> &Bytes {
        &self.data
    }
}

impl TryFrom<RawMessage> for NewBlockHashesMessage {
    type Error = MessageError;

    fn try_from(message: RawMessage) -> Result<Self, Self::Error> {
        Self::read_from(&message)
    }
}

impl fmt::Display for NewBlockHashesMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NewBlockHashesMessage: [")?;
        let hashes = match self.new_hashes() {
            Ok(hashes) => hashes,
            Err(err) => return write!(f, "<{err}>]"),
        };
        for (i, announced) in hashes.enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match announced {
                Ok(announced) => write!(f, "{announced}")?,
                Err(err) => write!(f, "<{err}>")?,
            }
        }
        write!(f, "]")
    }
}

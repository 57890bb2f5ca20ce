use std::{iter::FusedIterator, marker::PhantomData};

use alloy_primitives::Bytes;
use alloy_rlp::{Decodable, Encodable, Header};

use super::MessageError;

/// Forward-only cursor over the items of a single RLP list.
///
/// The cursor never reads past the payload of the list it was opened on, so a
/// malformed item cannot swallow bytes belonging to its siblings.
#[derive(Debug, Clone, Copy)]
pub struct ListReader<'a> {
    payload: &'a [u8],
}

impl<'a> ListReader<'a> {
    /// Opens a message body that must consist of exactly one list.
    pub fn open(data: &'a [u8]) -> Result<Self, MessageError> {
        let mut buf = data;
        let reader = Self::enter(&mut buf)?;
        if !buf.is_empty() {
            return Err(MessageError::TrailingBytes(buf.len()));
        }
        Ok(reader)
    }

    /// Consumes the list at the front of `buf` and returns a cursor over its items.
    pub fn enter(buf: &mut &'a [u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let (payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;
        Ok(Self { payload })
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn read<T: Decodable>(&mut self) -> alloy_rlp::Result<T> {
        if self.payload.is_empty() {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        T::decode(&mut self.payload)
    }

    pub fn read_list(&mut self) -> alloy_rlp::Result<ListReader<'a>> {
        Self::enter(&mut self.payload)
    }

    /// Fails if the list still holds items nobody asked for.
    pub fn finish(self) -> alloy_rlp::Result<()> {
        if !self.payload.is_empty() {
            return Err(alloy_rlp::Error::Custom("unexpected extra list items"));
        }
        Ok(())
    }
}

/// Lazily decodes the items of a list, one per `next()`.
///
/// Iteration stops for good after the first item that fails to decode.
#[derive(Debug, Clone)]
pub struct RlpListIter<'a, T> {
    reader: ListReader<'a>,
    failed: bool,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> RlpListIter<'a, T> {
    pub fn new(reader: ListReader<'a>) -> Self {
        Self {
            reader,
            failed: false,
            _item: PhantomData,
        }
    }
}

impl<T: Decodable> Iterator for RlpListIter<'_, T> {
    type Item = Result<T, MessageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let item = self.reader.read::<T>().map_err(MessageError::from);
        self.failed = item.is_err();
        Some(item)
    }
}

impl<T: Decodable> FusedIterator for RlpListIter<'_, T> {}

/// Encodes `items` as a single RLP list.
pub(crate) fn encode_list<'a, T, I>(items: I) -> Bytes
where
    T: Encodable + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: Clone,
{
    let items = items.into_iter();
    let payload_length = items.clone().map(|item| item.length()).sum();
    let header = Header {
        list: true,
        payload_length,
    };

    let mut out = Vec::with_capacity(header.length() + payload_length);
    header.encode(&mut out);
    for item in items {
        item.encode(&mut out);
    }
    out.into()
}

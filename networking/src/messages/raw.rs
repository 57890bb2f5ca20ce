use containers::Bytes;

use super::MessageError;

/// A message as framed by the transport: a protocol code plus its payload.
pub trait MessageData {
    fn code(&self) -> u32;

    fn data(&self) -> &Bytes;

    fn size(&self) -> usize {
        self.data().len()
    }
}

/// Generic message whose payload has not been interpreted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    code: u32,
    data: Bytes,
}

impl RawMessage {
    pub fn new(code: u32, data: impl Into<Bytes>) -> Self {
        Self {
            code,
            data: data.into(),
        }
    }

    /// Copies any message into a generic envelope.
    pub fn from_message<M: MessageData + ?Sized>(message: &M) -> Self {
        Self::new(message.code(), message.data().clone())
    }
}

impl MessageData for RawMessage {
    fn code(&self) -> u32 {
        self.code
    }

    fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Rejects `message` unless it carries the `expected` code.
pub(crate) fn ensure_code<M: MessageData + ?Sized>(
    message: &M,
    expected: u32,
) -> Result<(), MessageError> {
    let actual = message.code();
    if actual != expected {
        return Err(MessageError::CodeMismatch { expected, actual });
    }
    Ok(())
}

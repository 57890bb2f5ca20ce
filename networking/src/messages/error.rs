use thiserror::Error;

use super::codes::message_name;

/// Failure to reinterpret or decode a peer message.
///
/// Any of these means the message is rejected; nothing is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error(
        "message has code {actual:#04x} and thus is not a {expected_name} message",
        expected_name = name_of(.expected)
    )]
    CodeMismatch { expected: u32, actual: u32 },

    #[error("malformed RLP payload: {0}")]
    Rlp(#[from] alloy_rlp::Error),

    #[error("{0} trailing bytes after message payload")]
    TrailingBytes(usize),
}

fn name_of(code: &u32) -> &'static str {
    message_name(*code).unwrap_or("unknown")
}

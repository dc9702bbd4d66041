use bytes::Bytes;
use msgdev_buffer::TERMINATOR;

use crate::ioctl::ControlCode;

/// Most content bytes a single whole-message read returns.
pub const GET_MESSAGE_LIMIT: usize = 99;

/// Conventional destination size for a whole-message read (limit + terminator).
pub const GET_MESSAGE_DESTINATION: usize = GET_MESSAGE_LIMIT + 1;

/// A control operation, built and consumed within one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Replace the message with a zero-terminated payload.
    ///
    /// The payload is taken up to and including its first zero byte. A
    /// payload without one is treated as if it ended with a terminator.
    SetMessage(Bytes),
    /// Read the whole message into a destination of `capacity` bytes.
    GetMessage { capacity: usize },
    /// Read the raw byte at `index`.
    GetNthByte { index: usize },
}

impl ControlRequest {
    /// A `SetMessage` request.
    pub fn set_message(payload: impl Into<Bytes>) -> Self {
        ControlRequest::SetMessage(payload.into())
    }

    /// A `GetMessage` request with the conventional destination size.
    pub fn get_message() -> Self {
        ControlRequest::GetMessage {
            capacity: GET_MESSAGE_DESTINATION,
        }
    }

    /// A `GetNthByte` request.
    pub fn get_nth_byte(index: usize) -> Self {
        ControlRequest::GetNthByte { index }
    }

    /// The command code this request travels under.
    pub fn code(&self) -> ControlCode {
        match self {
            ControlRequest::SetMessage(_) => ControlCode::SetMessage,
            ControlRequest::GetMessage { .. } => ControlCode::GetMessage,
            ControlRequest::GetNthByte { .. } => ControlCode::GetNthByte,
        }
    }
}

/// Result of a successful control operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlResponse {
    /// Bytes of the payload (terminator included) accepted by `SetMessage`.
    Written(usize),
    /// The message as returned by `GetMessage`, always ending in a terminator.
    Message(Bytes),
    /// The byte returned by `GetNthByte`.
    Byte(u8),
}

impl ControlResponse {
    /// Message content without its trailing terminator, for `Message`.
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            ControlResponse::Message(message) => Some(
                message
                    .strip_suffix(&[TERMINATOR])
                    .unwrap_or(&message[..]),
            ),
            _ => None,
        }
    }

    /// The numeric result slot: bytes written or the byte value.
    pub fn value(&self) -> Option<usize> {
        match self {
            ControlResponse::Written(written) => Some(*written),
            ControlResponse::Byte(byte) => Some(usize::from(*byte)),
            ControlResponse::Message(_) => None,
        }
    }
}

use bytes::{BufMut, BytesMut};
use msgdev_buffer::{ByteChannel, ReadCursor, TERMINATOR};
use tracing::debug;

use crate::error::{ControlError, Result};
use crate::gate::ExclusivityGate;
use crate::request::{ControlRequest, ControlResponse, GET_MESSAGE_LIMIT};

/// Runs control operations one at a time over a [`ByteChannel`].
///
/// Each dispatch takes the gate, performs the operation through the same
/// channel plain callers use, and releases the gate when the guard drops.
/// The channel itself never touches the gate, so calling it from inside the
/// held section cannot deadlock.
#[derive(Debug)]
pub struct ControlDispatcher {
    channel: ByteChannel,
    gate: ExclusivityGate,
    get_message_limit: usize,
}

impl ControlDispatcher {
    /// Create a dispatcher with the default whole-message read limit.
    pub fn new(channel: ByteChannel) -> Self {
        Self::with_limit(channel, GET_MESSAGE_LIMIT)
    }

    /// Create a dispatcher with an explicit whole-message read limit.
    pub fn with_limit(channel: ByteChannel, get_message_limit: usize) -> Self {
        Self {
            channel,
            gate: ExclusivityGate::new(),
            get_message_limit,
        }
    }

    /// The gate guarding this dispatcher.
    pub fn gate(&self) -> &ExclusivityGate {
        &self.gate
    }

    /// The channel control operations delegate to.
    pub fn channel(&self) -> &ByteChannel {
        &self.channel
    }

    /// Run one control operation.
    ///
    /// Fails with [`ControlError::Busy`] without doing anything when another
    /// dispatch holds the gate.
    pub fn dispatch(&self, request: &ControlRequest) -> Result<ControlResponse> {
        let code = request.code();
        let _guard = self.gate.try_acquire().inspect_err(|_| {
            debug!(command = code.name(), "control gate busy");
        })?;

        let response = match request {
            ControlRequest::SetMessage(payload) => self.set_message(payload),
            ControlRequest::GetMessage { capacity } => self.get_message(*capacity),
            ControlRequest::GetNthByte { index } => self.get_nth_byte(*index),
        };
        debug!(command = code.name(), ok = response.is_ok(), "control operation done");
        response
    }

    fn set_message(&self, payload: &[u8]) -> Result<ControlResponse> {
        let written = match payload.iter().position(|b| *b == TERMINATOR) {
            Some(end) => self.channel.write(&payload[..=end]),
            None => {
                let mut terminated = Vec::with_capacity(payload.len() + 1);
                terminated.extend_from_slice(payload);
                terminated.push(TERMINATOR);
                self.channel.write(&terminated)
            }
        };
        Ok(ControlResponse::Written(written))
    }

    fn get_message(&self, capacity: usize) -> Result<ControlResponse> {
        if capacity == 0 {
            return Err(ControlError::DestinationTooSmall { capacity });
        }

        // One bounded read from the start; no draining loop.
        let limit = self.get_message_limit.min(capacity - 1);
        let mut cursor = ReadCursor::new();
        let content = self.channel.read(&mut cursor, limit);

        let mut message = BytesMut::with_capacity(content.len() + 1);
        message.extend_from_slice(&content);
        message.put_u8(TERMINATOR);
        Ok(ControlResponse::Message(message.freeze()))
    }

    fn get_nth_byte(&self, index: usize) -> Result<ControlResponse> {
        let byte = self.channel.buffer().byte_at(index)?;
        Ok(ControlResponse::Byte(byte))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use msgdev_buffer::{MessageBuffer, CAPACITY};

    use super::*;
    use crate::gate::GateState;

    fn dispatcher() -> ControlDispatcher {
        ControlDispatcher::new(ByteChannel::new(Arc::new(MessageBuffer::new())))
    }

    #[test]
    fn set_message_writes_terminator() {
        let dispatcher = dispatcher();
        let response = dispatcher
            .dispatch(&ControlRequest::set_message("world"))
            .unwrap();
        assert_eq!(response, ControlResponse::Written(6));
        assert_eq!(
            dispatcher
                .dispatch(&ControlRequest::get_nth_byte(0))
                .unwrap(),
            ControlResponse::Byte(119)
        );
        assert_eq!(
            dispatcher
                .dispatch(&ControlRequest::get_nth_byte(5))
                .unwrap(),
            ControlResponse::Byte(0)
        );
    }

    #[test]
    fn set_message_stops_at_embedded_zero() {
        let dispatcher = dispatcher();
        let response = dispatcher
            .dispatch(&ControlRequest::set_message(&b"ab\0cd"[..]))
            .unwrap();
        assert_eq!(response, ControlResponse::Written(3));
        assert_eq!(
            dispatcher.channel().buffer().byte_at(3),
            Ok(0),
            "bytes after the terminator are not written"
        );
    }

    #[test]
    fn set_message_hides_longer_previous_message() {
        let dispatcher = dispatcher();
        dispatcher
            .dispatch(&ControlRequest::set_message("a much longer message"))
            .unwrap();
        dispatcher
            .dispatch(&ControlRequest::set_message("short"))
            .unwrap();
        let response = dispatcher.dispatch(&ControlRequest::get_message()).unwrap();
        assert_eq!(response.content(), Some(&b"short"[..]));
    }

    #[test]
    fn set_message_truncates_at_capacity() {
        let dispatcher = dispatcher();
        let payload = vec![b'x'; CAPACITY + 10];
        let response = dispatcher
            .dispatch(&ControlRequest::set_message(payload))
            .unwrap();
        assert_eq!(response, ControlResponse::Written(CAPACITY));
    }

    #[test]
    fn get_message_appends_terminator() {
        let dispatcher = dispatcher();
        dispatcher.channel().write(b"hello");
        let response = dispatcher.dispatch(&ControlRequest::get_message()).unwrap();
        assert_eq!(response, ControlResponse::Message(b"hello\0".to_vec().into()));
    }

    #[test]
    fn get_message_on_empty_buffer_is_just_terminator() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch(&ControlRequest::get_message()).unwrap();
        assert_eq!(response, ControlResponse::Message(vec![0u8].into()));
    }

    #[test]
    fn get_message_is_single_bounded_read() {
        let channel = ByteChannel::new(Arc::new(MessageBuffer::new()));
        channel.write(b"0123456789");
        let dispatcher = ControlDispatcher::with_limit(channel, 4);

        let response = dispatcher.dispatch(&ControlRequest::get_message()).unwrap();
        assert_eq!(response.content(), Some(&b"0123"[..]));
    }

    #[test]
    fn get_message_respects_destination_capacity() {
        let dispatcher = dispatcher();
        dispatcher.channel().write(b"hello");

        let response = dispatcher
            .dispatch(&ControlRequest::GetMessage { capacity: 3 })
            .unwrap();
        assert_eq!(response, ControlResponse::Message(b"he\0".to_vec().into()));

        let response = dispatcher
            .dispatch(&ControlRequest::GetMessage { capacity: 1 })
            .unwrap();
        assert_eq!(response, ControlResponse::Message(vec![0u8].into()));

        assert_eq!(
            dispatcher.dispatch(&ControlRequest::GetMessage { capacity: 0 }),
            Err(ControlError::DestinationTooSmall { capacity: 0 })
        );
    }

    #[test]
    fn get_nth_byte_past_capacity_is_out_of_range() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dispatch(&ControlRequest::get_nth_byte(CAPACITY)),
            Err(ControlError::OutOfRange {
                index: CAPACITY,
                capacity: CAPACITY
            })
        );
        assert_eq!(dispatcher.gate().state(), GateState::Free);
    }

    #[test]
    fn dispatch_while_gate_held_is_busy() {
        let dispatcher = dispatcher();
        let guard = dispatcher.gate().try_acquire().unwrap();

        for request in [
            ControlRequest::set_message("ignored"),
            ControlRequest::get_message(),
            ControlRequest::get_nth_byte(0),
        ] {
            assert_eq!(dispatcher.dispatch(&request), Err(ControlError::Busy));
        }
        assert_eq!(dispatcher.channel().buffer().byte_at(0), Ok(0));

        drop(guard);
        assert!(dispatcher.dispatch(&ControlRequest::get_nth_byte(0)).is_ok());
    }

    #[test]
    fn plain_write_bypasses_held_gate() {
        let dispatcher = dispatcher();
        let _guard = dispatcher.gate().try_acquire().unwrap();
        assert_eq!(dispatcher.channel().write(b"ungated"), 7);
    }
}

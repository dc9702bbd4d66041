use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cursor::ReadCursor;
use crate::storage::{MessageBuffer, ReadOutcome, CAPACITY};

/// Configuration for the plain byte channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelConfig {
    /// Emit a warning when a write is cut short at capacity. Byte counts are
    /// the same either way.
    pub warn_on_truncation: bool,
}

/// Plain read/write access to a shared [`MessageBuffer`].
///
/// The channel takes no lock of any kind. Control operations that need
/// exclusivity call into it while holding their own gate.
#[derive(Debug, Clone)]
pub struct ByteChannel {
    buffer: Arc<MessageBuffer>,
    config: ChannelConfig,
}

impl ByteChannel {
    /// Create a channel over `buffer` with default configuration.
    pub fn new(buffer: Arc<MessageBuffer>) -> Self {
        Self::with_config(buffer, ChannelConfig::default())
    }

    /// Create a channel with explicit configuration.
    pub fn with_config(buffer: Arc<MessageBuffer>, config: ChannelConfig) -> Self {
        Self { buffer, config }
    }

    /// The shared storage behind this channel.
    pub fn buffer(&self) -> &Arc<MessageBuffer> {
        &self.buffer
    }

    /// Current channel configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Read from the cursor position into `dst`.
    ///
    /// Returns the number of bytes copied and advances the cursor by the same
    /// amount. When the cursor sits on the end of content, returns 0 and
    /// rewinds the cursor so the next call starts over.
    pub fn read_into(&self, cursor: &mut ReadCursor, dst: &mut [u8]) -> usize {
        let offset = cursor.offset();
        match self.buffer.read_from(offset, dst) {
            ReadOutcome::End => {
                debug!(offset, "end of message, rewinding cursor");
                cursor.reset();
                0
            }
            ReadOutcome::Copied(read) => {
                cursor.advance(read);
                debug!(offset, read, left = dst.len() - read, "read message bytes");
                read
            }
        }
    }

    /// Read up to `max` bytes from the cursor position.
    ///
    /// An empty result means end of message (the cursor was rewound) or
    /// `max == 0`.
    pub fn read(&self, cursor: &mut ReadCursor, max: usize) -> Bytes {
        let mut dst = vec![0u8; max.min(CAPACITY)];
        let read = self.read_into(cursor, &mut dst);
        dst.truncate(read);
        Bytes::from(dst)
    }

    /// Overwrite the start of the message with `src`.
    ///
    /// Returns how many bytes of `src` were accepted.
    pub fn write(&self, src: &[u8]) -> usize {
        let written = self.buffer.write(src);
        if written < src.len() && self.config.warn_on_truncation {
            warn!(
                requested = src.len(),
                written,
                capacity = CAPACITY,
                "message truncated at capacity"
            );
        }
        debug!(requested = src.len(), written, "wrote message bytes");
        written
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn channel() -> ByteChannel {
        ByteChannel::new(Arc::new(MessageBuffer::new()))
    }

    fn drain(channel: &ByteChannel, cursor: &mut ReadCursor, chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let bytes = channel.read(cursor, chunk);
            if bytes.is_empty() {
                return out;
            }
            out.extend_from_slice(&bytes);
        }
    }

    #[test]
    fn read_resumes_across_calls() {
        let channel = channel();
        channel.write(b"hello");
        let mut cursor = ReadCursor::new();

        assert_eq!(channel.read(&mut cursor, 2).as_ref(), b"he");
        assert_eq!(cursor.offset(), 2);
        assert_eq!(channel.read(&mut cursor, 2).as_ref(), b"ll");
        assert_eq!(channel.read(&mut cursor, 2).as_ref(), b"o");
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn end_of_message_rewinds_cursor() {
        let channel = channel();
        channel.write(b"abc");
        let mut cursor = ReadCursor::new();

        assert_eq!(channel.read(&mut cursor, 16).as_ref(), b"abc");
        assert!(channel.read(&mut cursor, 16).is_empty());
        assert_eq!(cursor.offset(), 0);
        assert_eq!(channel.read(&mut cursor, 16).as_ref(), b"abc");
    }

    #[test]
    fn zero_length_read_keeps_cursor() {
        let channel = channel();
        channel.write(b"abc");
        let mut cursor = ReadCursor::new();
        cursor.advance(1);

        assert!(channel.read(&mut cursor, 0).is_empty());
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn empty_write_then_read_is_end_of_stream() {
        let channel = channel();
        assert_eq!(channel.write(b""), 0);
        let mut cursor = ReadCursor::new();
        assert!(channel.read(&mut cursor, 10).is_empty());
    }

    #[test]
    fn oversized_read_request_is_bounded() {
        let channel = channel();
        channel.write(b"tiny");
        let mut cursor = ReadCursor::new();
        assert_eq!(channel.read(&mut cursor, usize::MAX).as_ref(), b"tiny");
    }

    #[test]
    fn full_buffer_drains_to_capacity() {
        let channel = channel();
        let input: Vec<u8> = (1..=100u8).collect();
        assert_eq!(channel.write(&input), CAPACITY);

        let mut cursor = ReadCursor::new();
        assert_eq!(drain(&channel, &mut cursor, 7), &input[..CAPACITY]);
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    #[traced_test]
    fn truncation_warning_keeps_byte_count() {
        let channel = ByteChannel::with_config(
            Arc::new(MessageBuffer::new()),
            ChannelConfig {
                warn_on_truncation: true,
            },
        );
        assert_eq!(channel.write(&[b'q'; CAPACITY * 2]), CAPACITY);
        assert!(logs_contain("message truncated at capacity"));
        assert!(logs_contain("requested=160"));
    }

    #[test]
    #[traced_test]
    fn truncation_is_silent_by_default() {
        let channel = channel();
        assert_eq!(channel.write(&[b'q'; CAPACITY * 2]), CAPACITY);
        assert!(!logs_contain("message truncated at capacity"));
        assert!(logs_contain("wrote message bytes"));
    }

    #[test]
    #[traced_test]
    fn write_within_capacity_never_warns() {
        let channel = ByteChannel::with_config(
            Arc::new(MessageBuffer::new()),
            ChannelConfig {
                warn_on_truncation: true,
            },
        );
        assert_eq!(channel.write(&[b'q'; CAPACITY]), CAPACITY);
        assert!(!logs_contain("message truncated at capacity"));
    }
}

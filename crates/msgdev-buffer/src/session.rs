use std::io::{Read, Write};

use bytes::Bytes;

use crate::channel::ByteChannel;
use crate::cursor::ReadCursor;

/// One caller's view of the shared message: a channel plus a private cursor.
///
/// Implements `Read + Write`. End of message shows up as `Ok(0)` from
/// [`Read::read`], after which the session starts over from the beginning.
#[derive(Debug, Clone)]
pub struct Session {
    channel: ByteChannel,
    cursor: ReadCursor,
}

impl Session {
    /// Open a session at offset 0.
    pub fn new(channel: ByteChannel) -> Self {
        Self {
            channel,
            cursor: ReadCursor::new(),
        }
    }

    /// Read up to `max` bytes from this session's position.
    pub fn read_chunk(&mut self, max: usize) -> Bytes {
        self.channel.read(&mut self.cursor, max)
    }

    /// Overwrite the shared message. The cursor is left where it is.
    pub fn write_message(&self, src: &[u8]) -> usize {
        self.channel.write(src)
    }

    /// Read chunks until end of message and return everything read.
    ///
    /// The session is back at offset 0 afterwards.
    pub fn read_to_end_of_message(&mut self, chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        if chunk == 0 {
            return out;
        }
        loop {
            let bytes = self.read_chunk(chunk);
            if bytes.is_empty() {
                return out;
            }
            out.extend_from_slice(&bytes);
        }
    }

    /// This session's cursor.
    pub fn cursor(&self) -> &ReadCursor {
        &self.cursor
    }

    /// The channel this session reads and writes through.
    pub fn channel(&self) -> &ByteChannel {
        &self.channel
    }
}

impl Read for Session {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(self.channel.read_into(&mut self.cursor, buf))
    }
}

impl Write for Session {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(self.channel.write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

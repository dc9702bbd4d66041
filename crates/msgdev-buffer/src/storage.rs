use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{BufferError, Result};

/// Physical capacity of the message storage in bytes.
pub const CAPACITY: usize = 80;

/// Byte value that marks the logical end of content.
pub const TERMINATOR: u8 = 0;

/// Result of a streamed read starting at some offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The offset sits on a terminator. The reader should rewind to 0.
    End,
    /// Bytes copied into the destination (may be 0 for an empty destination).
    Copied(usize),
}

/// Fixed-capacity, zero-terminated message storage.
///
/// Every byte is an independent atomic cell. Callers that bypass any
/// higher-level gating can race on content (a reader may observe a mix of an
/// old and a new message) but never on memory.
///
/// Writes do not clear the storage. After a short write the bytes past the
/// written range keep their previous values and stay reachable until a zero
/// byte is met.
pub struct MessageBuffer {
    storage: [AtomicU8; CAPACITY],
}

impl MessageBuffer {
    /// Create an empty buffer (all bytes zero).
    pub const fn new() -> Self {
        Self {
            storage: [const { AtomicU8::new(TERMINATOR) }; CAPACITY],
        }
    }

    /// Physical capacity in bytes.
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Copy up to [`CAPACITY`] bytes of `src` to the start of the storage.
    ///
    /// Returns the number of bytes copied. Input past capacity is dropped
    /// silently.
    pub fn write(&self, src: &[u8]) -> usize {
        let count = src.len().min(CAPACITY);
        for (cell, byte) in self.storage.iter().zip(&src[..count]) {
            cell.store(*byte, Ordering::Relaxed);
        }
        count
    }

    /// Streamed read from `offset` into `dst`.
    ///
    /// Copies byte by byte until `dst` is full or a terminator is met; the
    /// terminator is never copied. An offset at or past capacity reads as a
    /// terminator.
    pub fn read_from(&self, offset: usize, dst: &mut [u8]) -> ReadOutcome {
        if self.load(offset) == TERMINATOR {
            return ReadOutcome::End;
        }

        let mut copied = 0;
        for slot in dst.iter_mut() {
            let byte = self.load(offset + copied);
            if byte == TERMINATOR {
                break;
            }
            *slot = byte;
            copied += 1;
        }
        ReadOutcome::Copied(copied)
    }

    /// The raw byte at `index`, whether or not it belongs to current content.
    pub fn byte_at(&self, index: usize) -> Result<u8> {
        self.storage
            .get(index)
            .map(|cell| cell.load(Ordering::Relaxed))
            .ok_or(BufferError::OutOfRange {
                index,
                capacity: CAPACITY,
            })
    }

    fn load(&self, index: usize) -> u8 {
        self.storage
            .get(index)
            .map_or(TERMINATOR, |cell| cell.load(Ordering::Relaxed))
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes: Vec<u8> = self
            .storage
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect();
        f.debug_struct("MessageBuffer")
            .field("storage", &bytes)
            .finish()
    }
}

//! Fixed-capacity message storage with streamed, cursor-based reads.
//!
//! This is the lowest layer of msgdev. A single [`MessageBuffer`] holds up to
//! [`CAPACITY`] bytes. There is no length field: the logical end of content is
//! the first zero byte found at or after a read offset.
//!
//! - [`MessageBuffer`]: the shared storage
//! - [`ReadCursor`]: per-session read position
//! - [`ByteChannel`]: ungated read/write over a shared buffer
//! - [`Session`]: a channel paired with its own cursor (`Read + Write`)

pub mod channel;
pub mod cursor;
pub mod error;
pub mod session;
pub mod storage;

pub use channel::{ByteChannel, ChannelConfig};
pub use cursor::ReadCursor;
pub use error::{BufferError, Result};
pub use session::Session;
pub use storage::{MessageBuffer, ReadOutcome, CAPACITY, TERMINATOR};

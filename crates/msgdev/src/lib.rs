//! Shared in-memory message device with gated control operations.
//!
//! One fixed-capacity, zero-terminated message is shared by every caller.
//! Callers either stream it through a [`Session`] (plain, ungated reads and
//! writes with a private cursor) or run control operations through
//! [`MessageDevice::control`], which admits one operation at a time and
//! answers [`ControlError::Busy`] to the rest.
//!
//! # Crate Structure
//!
//! - [`buffer`]: storage, read cursors, the plain byte channel
//! - [`control`]: exclusivity gate, command codes, dispatcher, device

/// Re-export buffer types.
pub mod buffer {
    pub use msgdev_buffer::*;
}

/// Re-export control types.
pub mod control {
    pub use msgdev_control::*;
}

pub use msgdev_buffer::{Session, CAPACITY};
pub use msgdev_control::{
    ControlError, ControlRequest, ControlResponse, DeviceConfig, MessageDevice,
};

//! Gated control operations over the shared message.
//!
//! Plain reads and writes go straight through [`msgdev_buffer::ByteChannel`].
//! Control operations (set message, get message, get one byte) go through a
//! [`ControlDispatcher`], which admits one operation at a time through a
//! non-blocking [`ExclusivityGate`] and answers [`ControlError::Busy`] to
//! everyone else.
//!
//! [`MessageDevice`] ties both paths to one shared buffer.

pub mod device;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod ioctl;
pub mod request;

pub use device::{DeviceConfig, MessageDevice};
pub use dispatcher::ControlDispatcher;
pub use error::{ControlError, Result};
pub use gate::{ExclusivityGate, GateGuard, GateState};
pub use ioctl::{
    ControlCode, DEVICE_FILE_NAME, DEVICE_NAME, DEVICE_PATH, IOCTL_GET_MSG, IOCTL_GET_NTH_BYTE,
    IOCTL_SET_MSG, MAJOR_NUM,
};
pub use request::{
    ControlRequest, ControlResponse, GET_MESSAGE_DESTINATION, GET_MESSAGE_LIMIT,
};

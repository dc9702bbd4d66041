//! Numeric control command codes.
//!
//! Codes follow the Linux `_IOC` layout under major number [`MAJOR_NUM`], so
//! a client built against the character-device header sends the same numbers.

use std::mem::size_of;
use std::os::raw::{c_char, c_int};

use crate::error::ControlError;

/// Major device number the command codes are namespaced under.
pub const MAJOR_NUM: u32 = 100;

/// Registered device name.
pub const DEVICE_NAME: &str = "char_dev";

/// Device node file name.
pub const DEVICE_FILE_NAME: &str = "char_dev";

/// Conventional device node path.
pub const DEVICE_PATH: &str = "/dev/char_dev";

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

const fn ioc(dir: u32, ty: u32, nr: u32, size: usize) -> u32 {
    (dir << IOC_DIRSHIFT)
        | (ty << IOC_TYPESHIFT)
        | (nr << IOC_NRSHIFT)
        | ((size as u32) << IOC_SIZESHIFT)
}

/// Set the message: `_IOW(MAJOR_NUM, 0, char *)`.
pub const IOCTL_SET_MSG: u32 = ioc(IOC_WRITE, MAJOR_NUM, 0, size_of::<*mut c_char>());

/// Get the message: `_IOR(MAJOR_NUM, 1, char *)`.
pub const IOCTL_GET_MSG: u32 = ioc(IOC_READ, MAJOR_NUM, 1, size_of::<*mut c_char>());

/// Get the n-th byte of the message: `_IOWR(MAJOR_NUM, 2, int)`.
pub const IOCTL_GET_NTH_BYTE: u32 =
    ioc(IOC_READ | IOC_WRITE, MAJOR_NUM, 2, size_of::<c_int>());

/// A decoded control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCode {
    SetMessage,
    GetMessage,
    GetNthByte,
}

impl ControlCode {
    /// The numeric command code.
    pub const fn number(self) -> u32 {
        match self {
            ControlCode::SetMessage => IOCTL_SET_MSG,
            ControlCode::GetMessage => IOCTL_GET_MSG,
            ControlCode::GetNthByte => IOCTL_GET_NTH_BYTE,
        }
    }

    /// Human-readable command name.
    pub fn name(self) -> &'static str {
        match self {
            ControlCode::SetMessage => "SET_MSG",
            ControlCode::GetMessage => "GET_MSG",
            ControlCode::GetNthByte => "GET_NTH_BYTE",
        }
    }
}

impl TryFrom<u32> for ControlCode {
    type Error = ControlError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            IOCTL_SET_MSG => Ok(ControlCode::SetMessage),
            IOCTL_GET_MSG => Ok(ControlCode::GetMessage),
            IOCTL_GET_NTH_BYTE => Ok(ControlCode::GetNthByte),
            other => Err(ControlError::UnknownCommand(other)),
        }
    }
}

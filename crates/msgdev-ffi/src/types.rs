use std::ffi::c_void;

use msgdev_buffer::Session;

/// Status of the lifecycle calls. Data-path calls return negative errno values
/// instead.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgdevResult {
    Ok = 0,
    Internal = 99,
}

pub type MsgdevSessionHandle = *mut c_void;

pub(crate) struct SessionHandle {
    pub(crate) session: Session,
}

//! msgdev-ffi: C-ABI exports for the process-wide message device.
//!
//! The surface mirrors a character device: `open`/`close` manage sessions,
//! `read`/`write` use the plain path, and `msgdev_ioctl` runs gated control
//! commands with negative-errno results.

mod control;
mod error;
mod session;
mod types;

use std::panic::AssertUnwindSafe;

pub use control::{msgdev_get_message, msgdev_ioctl};
pub use msgdev_control::{IOCTL_GET_MSG, IOCTL_GET_NTH_BYTE, IOCTL_SET_MSG};
pub use session::{msgdev_close, msgdev_open, msgdev_read, msgdev_write};
pub use types::{MsgdevResult, MsgdevSessionHandle};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Create the global device if needed and clear this thread's error state.
#[no_mangle]
pub extern "C" fn msgdev_init() -> MsgdevResult {
    ffi_boundary(MsgdevResult::Internal, || {
        error::clear_error_state();
        let _ = msgdev_control::MessageDevice::global();
        MsgdevResult::Ok
    })
}

#[no_mangle]
pub extern "C" fn msgdev_cleanup() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

#[no_mangle]
pub extern "C" fn msgdev_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::os::raw::c_long;

    use super::*;

    fn last_error() -> String {
        let ptr = msgdev_last_error();
        assert!(!ptr.is_null());
        // SAFETY: msgdev_last_error returns a pointer to a thread-local CString.
        unsafe { CStr::from_ptr(ptr).to_string_lossy().into_owned() }
    }

    #[test]
    fn init_and_cleanup_are_ok() {
        assert_eq!(msgdev_init(), MsgdevResult::Ok);
        msgdev_cleanup();
        assert!(last_error().is_empty());
    }

    #[test]
    fn unknown_command_is_enotty() {
        let ret = unsafe { msgdev_ioctl(0xdead, 0) };
        assert_eq!(ret, -c_long::from(libc::ENOTTY));
        assert!(last_error().contains("unknown control command"));
    }

    #[test]
    fn null_message_pointer_is_efault() {
        let ret = unsafe { msgdev_ioctl(IOCTL_SET_MSG, 0) };
        assert_eq!(ret, -c_long::from(libc::EFAULT));
        let ret = unsafe { msgdev_ioctl(IOCTL_GET_MSG, 0) };
        assert_eq!(ret, -c_long::from(libc::EFAULT));
    }

    #[test]
    fn index_past_capacity_is_einval() {
        let ret = unsafe { msgdev_ioctl(IOCTL_GET_NTH_BYTE, 80) };
        assert_eq!(ret, -c_long::from(libc::EINVAL));
        assert!(last_error().contains("out of range"));
    }
}

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_long};

use msgdev_control::ControlError;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::new("").expect("empty CString should be valid"));
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new("").expect("empty CString should be valid");
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized)
            .unwrap_or_else(|_| CString::new("internal error").expect("literal is valid"));
    });
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

/// Record `message` and return `-EFAULT`.
pub(crate) fn fault(message: impl Into<String>) -> c_long {
    set_error_message(message);
    -c_long::from(libc::EFAULT)
}

/// Record `err` and return the negative errno a character device would.
pub(crate) fn map_control_error(err: &ControlError) -> c_long {
    set_error_message(err.to_string());
    let errno = match err {
        ControlError::Busy => libc::EBUSY,
        ControlError::OutOfRange { .. } | ControlError::DestinationTooSmall { .. } => libc::EINVAL,
        ControlError::UnknownCommand(_) => libc::ENOTTY,
    };
    -c_long::from(errno)
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

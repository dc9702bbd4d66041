use std::os::raw::c_long;

use msgdev_control::MessageDevice;

use crate::error;
use crate::types::{MsgdevSessionHandle, SessionHandle};

fn with_session_mut<T>(
    handle: MsgdevSessionHandle,
    on_error: T,
    f: impl FnOnce(&mut SessionHandle) -> T,
) -> T {
    if handle.is_null() {
        error::set_error_message("session handle cannot be null");
        return on_error;
    }

    let session_handle = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *(handle as *mut SessionHandle) }
    };

    f(session_handle)
}

/// Open a session on the global device with its own read cursor.
///
/// The returned handle must be released with [`msgdev_close`].
#[no_mangle]
pub extern "C" fn msgdev_open() -> MsgdevSessionHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        let session = MessageDevice::global().open();
        Box::into_raw(Box::new(SessionHandle { session })) as MsgdevSessionHandle
    })
}

/// Release a session handle.
///
/// # Safety
/// `handle` must be null or a handle returned by [`msgdev_open`] that has not
/// been closed yet.
#[no_mangle]
pub unsafe extern "C" fn msgdev_close(handle: MsgdevSessionHandle) {
    crate::ffi_boundary((), || {
        if handle.is_null() {
            return;
        }
        // SAFETY: `handle` was allocated by `msgdev_open`.
        unsafe {
            drop(Box::from_raw(handle as *mut SessionHandle));
        }
    });
}

/// Read up to `len` bytes from the session position into `buf`.
///
/// Returns the number of bytes read, 0 at end of message (the session then
/// starts over), or a negative errno.
///
/// # Safety
/// `handle` must come from [`msgdev_open`]; `buf` must be valid for `len`
/// bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn msgdev_read(
    handle: MsgdevSessionHandle,
    buf: *mut u8,
    len: usize,
) -> c_long {
    crate::ffi_boundary(-c_long::from(libc::EIO), || {
        if buf.is_null() && len > 0 {
            return error::fault("buf cannot be null");
        }
        with_session_mut(handle, -c_long::from(libc::EFAULT), |handle| {
            let chunk = handle.session.read_chunk(len);
            if !chunk.is_empty() {
                // SAFETY: The caller guarantees `buf` is valid for `len` bytes and
                // `chunk.len() <= len`.
                let dst = unsafe { std::slice::from_raw_parts_mut(buf, chunk.len()) };
                dst.copy_from_slice(&chunk);
            }
            chunk.len() as c_long
        })
    })
}

/// Overwrite the global message with `len` bytes from `buf`.
///
/// Returns the number of bytes accepted or a negative errno.
///
/// # Safety
/// `buf` must be valid for `len` bytes of reads.
#[no_mangle]
pub unsafe extern "C" fn msgdev_write(buf: *const u8, len: usize) -> c_long {
    crate::ffi_boundary(-c_long::from(libc::EIO), || {
        if len == 0 {
            return MessageDevice::global().write(&[]) as c_long;
        }
        if buf.is_null() {
            return error::fault("buf cannot be null");
        }
        // SAFETY: The caller guarantees `buf` is valid for `len` bytes.
        let src = unsafe { std::slice::from_raw_parts(buf, len) };
        MessageDevice::global().write(src) as c_long
    })
}

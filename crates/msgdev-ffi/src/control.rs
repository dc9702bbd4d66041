use std::os::raw::{c_char, c_long, c_uint};

use msgdev_buffer::{CAPACITY, TERMINATOR};
use msgdev_control::{
    ControlCode, ControlRequest, ControlResponse, MessageDevice, GET_MESSAGE_DESTINATION,
};

use crate::error;

const SUCCESS: c_long = 0;

/// Run a control command against the global device.
///
/// Follows the character-device ioctl convention. `param` is pointer-sized so
/// it carries an address intact on every target:
/// - `IOCTL_SET_MSG`: `param` points to a NUL-terminated message; returns 0.
/// - `IOCTL_GET_MSG`: `param` points to a destination of at least
///   `GET_MESSAGE_DESTINATION` (100) bytes; returns 0.
/// - `IOCTL_GET_NTH_BYTE`: `param` is the index; returns the byte value.
///
/// Failures are negative errno values: `-EBUSY` while another control
/// command runs, `-EINVAL` for an index past capacity, `-ENOTTY` for an
/// unknown command and `-EFAULT` for a null pointer.
///
/// # Safety
/// For the pointer-carrying commands `param` must be a valid pointer as
/// described above.
#[no_mangle]
pub unsafe extern "C" fn msgdev_ioctl(code: c_uint, param: usize) -> c_long {
    crate::ffi_boundary(-c_long::from(libc::EIO), || {
        let code = match ControlCode::try_from(code) {
            Ok(code) => code,
            Err(err) => return error::map_control_error(&err),
        };

        match code {
            ControlCode::SetMessage => {
                let src = param as *const c_char;
                if src.is_null() {
                    return error::fault("message pointer cannot be null");
                }
                // SAFETY: The caller guarantees `src` points to a NUL-terminated string.
                let payload = unsafe { scan_message(src) };
                match MessageDevice::global().control(&ControlRequest::set_message(payload)) {
                    Ok(_) => SUCCESS,
                    Err(err) => error::map_control_error(&err),
                }
            }
            ControlCode::GetMessage => {
                let dst = param as *mut u8;
                if dst.is_null() {
                    return error::fault("destination pointer cannot be null");
                }
                // SAFETY: The caller guarantees `GET_MESSAGE_DESTINATION` writable bytes.
                match unsafe { get_message_into(dst, GET_MESSAGE_DESTINATION) } {
                    Ok(_) => SUCCESS,
                    Err(errno) => errno,
                }
            }
            ControlCode::GetNthByte => {
                match MessageDevice::global().control(&ControlRequest::get_nth_byte(param)) {
                    Ok(response) => response.value().map_or(SUCCESS, |v| v as c_long),
                    Err(err) => error::map_control_error(&err),
                }
            }
        }
    })
}

/// Copy the zero-terminated message into `buf` of `capacity` bytes.
///
/// Returns the number of content bytes copied (terminator excluded) or a
/// negative errno.
///
/// # Safety
/// `buf` must be valid for `capacity` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn msgdev_get_message(buf: *mut u8, capacity: usize) -> c_long {
    crate::ffi_boundary(-c_long::from(libc::EIO), || {
        if buf.is_null() {
            return error::fault("buf cannot be null");
        }
        // SAFETY: Forwarded caller guarantee.
        match unsafe { get_message_into(buf, capacity) } {
            Ok(copied) => copied as c_long,
            Err(errno) => errno,
        }
    })
}

/// Read at most `CAPACITY` bytes from `src`, stopping after the first NUL.
unsafe fn scan_message(src: *const c_char) -> Vec<u8> {
    let mut payload = Vec::with_capacity(CAPACITY);
    for i in 0..CAPACITY {
        // SAFETY: Bytes up to and including the NUL are readable per caller contract.
        let byte = unsafe { *src.add(i) } as u8;
        payload.push(byte);
        if byte == TERMINATOR {
            break;
        }
    }
    payload
}

unsafe fn get_message_into(dst: *mut u8, capacity: usize) -> Result<usize, c_long> {
    let request = ControlRequest::GetMessage { capacity };
    match MessageDevice::global().control(&request) {
        Ok(ControlResponse::Message(message)) => {
            // SAFETY: The dispatcher never returns more than `capacity` bytes.
            let out = unsafe { std::slice::from_raw_parts_mut(dst, message.len()) };
            out.copy_from_slice(&message);
            Ok(message.len() - 1)
        }
        Ok(_) => Err(error::fault("unexpected control response")),
        Err(err) => Err(error::map_control_error(&err)),
    }
}

//! C ABI for camera hosts.
//!
//! The host lends its frame buffer for the duration of the call and receives
//! a freshly allocated edge buffer, which it must hand back through
//! [`edgecam_free_buffer`]. The detector is chosen once per process from the
//! environment (see [`active_detector`]).

use std::ffi::c_char;

use crate::detector::{active_detector, detect_bytes};
use crate::error::EdgeError;

pub const EDGECAM_OK: i32 = 0;
pub const EDGECAM_INVALID_INPUT: i32 = -1;
pub const EDGECAM_ALLOCATION_FAILURE: i32 = -2;
pub const EDGECAM_ERROR: i32 = -3;

fn status_code(err: &EdgeError) -> i32 {
    match err {
        EdgeError::InvalidInput { .. } => EDGECAM_INVALID_INPUT,
        EdgeError::AllocationFailure { .. } => EDGECAM_ALLOCATION_FAILURE,
        _ => EDGECAM_ERROR,
    }
}

/// Detect edges in a `width * height` grayscale frame.
///
/// On success writes an owned buffer to `out_ptr`/`out_len` and returns
/// `EDGECAM_OK`; the outputs are left untouched on failure.
///
/// # Safety
/// `data` must point to `len` readable bytes; `out_ptr` and `out_len` must be
/// valid for writes.
#[no_mangle]
pub unsafe extern "C" fn edgecam_detect(
    data: *const u8,
    len: usize,
    width: i32,
    height: i32,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> i32 {
    if data.is_null() || out_ptr.is_null() || out_len.is_null() {
        return EDGECAM_INVALID_INPUT;
    }
    let input = unsafe { std::slice::from_raw_parts(data, len) };

    match detect_bytes(active_detector(), input, width, height) {
        Ok(edges) => {
            let boxed = edges.into_boxed_slice();
            let n = boxed.len();
            unsafe {
                *out_len = n;
                *out_ptr = Box::into_raw(boxed) as *mut u8;
            }
            EDGECAM_OK
        }
        Err(err) => status_code(&err),
    }
}

/// Release a buffer returned by [`edgecam_detect`].
///
/// # Safety
/// `ptr`/`len` must come from one successful `edgecam_detect` call and must
/// not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn edgecam_free_buffer(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len);
    drop(unsafe { Box::from_raw(slice) });
}

/// Copy the active backend's version as a NUL-terminated string.
///
/// Returns the string length without the terminator; when it does not fit in
/// `cap` bytes the copy is truncated.
///
/// # Safety
/// `buf` must be valid for `cap` writable bytes, or null to query the length.
#[no_mangle]
pub unsafe extern "C" fn edgecam_version(buf: *mut c_char, cap: usize) -> usize {
    let version = active_detector().version();
    let bytes = version.as_bytes();
    if buf.is_null() || cap == 0 {
        return bytes.len();
    }
    let n = bytes.len().min(cap - 1);
    let out = unsafe { std::slice::from_raw_parts_mut(buf as *mut u8, cap) };
    out[..n].copy_from_slice(&bytes[..n]);
    out[n] = 0;
    bytes.len()
}

// SPDX-License-Identifier: MIT

//! Conversions between Rust and Win32 representations.

use std::ffi::{OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};

/// Convert the OS string into a null-terminated wide (16-bit) C string.
pub fn to_wide_nul(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// Copy a null-terminated wide C string owned by Windows.
///
/// # Safety
///
/// `ptr` must point to a readable, null-terminated UTF-16 buffer.
pub unsafe fn from_wide_nul(ptr: *const u16) -> OsString {
    let mut len = 0;
    while unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    OsString::from_wide(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Carry a Windows error as an I/O error.
pub fn io_error(e: windows::core::Error) -> std::io::Error {
    std::io::Error::other(format!("{:?}", e))
}

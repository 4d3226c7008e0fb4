#![allow(unsafe_code)]
//! Internal FFI utilities: borrowed C string helpers.

use std::ffi::{CStr, c_char, c_int};

/// Copy a **borrowed** `(ptr, len)` string out of native storage. Does NOT free anything.
///
/// Returns `None` for a null pointer or an empty string. Invalid UTF-8 is
/// replaced rather than rejected: these are diagnostics, not data.
///
/// # Safety
///
/// `ptr` must be null or point to at least `len` readable bytes (or, when
/// `len` is negative, to a NUL-terminated string) that stay valid for the
/// duration of this call.
pub(crate) unsafe fn read_borrowed_message(ptr: *const c_char, len: c_int) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let text = if len >= 0 {
        let bytes =
            unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len.unsigned_abs() as usize) };
        // Some shims count the terminator in `len`.
        let bytes = bytes.strip_suffix(b"\0").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    };
    let text = text.trim_end().to_owned();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_none() {
        assert_eq!(unsafe { read_borrowed_message(std::ptr::null(), 4) }, None);
    }

    #[test]
    fn reads_exact_length() {
        let raw = b"socket closed\0garbage";
        let msg = unsafe { read_borrowed_message(raw.as_ptr().cast(), 13) };
        assert_eq!(msg.as_deref(), Some("socket closed"));
    }

    #[test]
    fn drops_counted_terminator_and_trailing_newline() {
        let raw = b"no memory\n\0";
        let msg = unsafe { read_borrowed_message(raw.as_ptr().cast(), 11) };
        assert_eq!(msg.as_deref(), Some("no memory"));
    }

    #[test]
    fn negative_length_scans_for_nul() {
        let raw = c"timed out";
        let msg = unsafe { read_borrowed_message(raw.as_ptr(), -1) };
        assert_eq!(msg.as_deref(), Some("timed out"));
    }

    #[test]
    fn empty_is_none() {
        let raw = b"\0";
        assert_eq!(unsafe { read_borrowed_message(raw.as_ptr().cast(), 0) }, None);
    }
}

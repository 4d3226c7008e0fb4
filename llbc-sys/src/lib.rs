//! Raw ABI of `csllbc_native` — the C binding shim in front of the llbc core library.
//!
//! The shim is never linked at build time. Hosts open it at runtime (see the
//! `llbc` crate) and look up the symbols below, casting them to the matching
//! function-pointer types. Do not call these directly.
//!
//! # Exported functions
//!
//! ```c
//! int csllbc_Startup(void);
//! int csllbc_Cleanup(void);
//! const char *csllbc_FormatLastError(int *lastErrorLen);
//! const char *csllbc_StrError(unsigned int errNo, int *errLen);
//! ```
//!
//! Strings returned by the last two functions are owned by the native library
//! (thread-local or static storage) and must be copied before the next call.

// sys crate: C naming, raw pointers
#![allow(non_camel_case_types, non_upper_case_globals, non_snake_case)]
#![no_std]

use core::ffi::{c_char, c_int, c_uint};

/// Return code of every native function on success.
pub const LLBC_OK: c_int = 0;

/// Return code of every native function on failure.
pub const LLBC_FAILED: c_int = -1;

/// Core library base name for release builds.
pub const CORE_LIB_NAME: &str = "llbc";

/// Core library base name for debug builds.
pub const CORE_LIB_NAME_DEBUG: &str = "llbc_debug";

/// Binding shim base name for release builds.
pub const NATIVE_LIB_NAME: &str = "csllbc_native";

/// Binding shim base name for debug builds.
pub const NATIVE_LIB_NAME_DEBUG: &str = "csllbc_native_debug";

/// Variant matching the cargo profile this crate was built with (`"debug"` or
/// `"release"`), overridable through `LLBC_DEFAULT_VARIANT` at build time.
pub const DEFAULT_VARIANT: &str = env!("LLBC_SYS_DEFAULT_VARIANT");

/// NUL-terminated symbol name of the startup entry point.
pub const SYM_STARTUP: &[u8] = b"csllbc_Startup\0";

/// NUL-terminated symbol name of the cleanup entry point.
pub const SYM_CLEANUP: &[u8] = b"csllbc_Cleanup\0";

/// NUL-terminated symbol name of the last-error formatter.
pub const SYM_FORMAT_LAST_ERROR: &[u8] = b"csllbc_FormatLastError\0";

/// NUL-terminated symbol name of the errno describer.
pub const SYM_STR_ERROR: &[u8] = b"csllbc_StrError\0";

/// `int csllbc_Startup(void)`
pub type csllbc_Startup = unsafe extern "C" fn() -> c_int;

/// `int csllbc_Cleanup(void)`
pub type csllbc_Cleanup = unsafe extern "C" fn() -> c_int;

/// `const char *csllbc_FormatLastError(int *lastErrorLen)`
pub type csllbc_FormatLastError = unsafe extern "C" fn(lastErrorLen: *mut c_int) -> *const c_char;

/// `const char *csllbc_StrError(unsigned int errNo, int *errLen)`
pub type csllbc_StrError =
    unsafe extern "C" fn(errNo: c_uint, errLen: *mut c_int) -> *const c_char;

/// Strip the trailing NUL from one of the `SYM_*` constants for display.
#[must_use]
pub fn symbol_name(sym: &'static [u8]) -> &'static str {
    let bytes = match sym.split_last() {
        Some((0, rest)) => rest,
        _ => sym,
    };
    core::str::from_utf8(bytes).unwrap_or("<non-utf8 symbol>")
}

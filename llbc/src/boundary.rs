#![allow(unsafe_code)]
//! The native boundary: the only place that calls into the binding shim.

use std::ffi::c_int;
use std::fmt;

use libloading::Library;
use llbc_sys as sys;

use crate::error::{LifecycleError, Result};
use crate::ffi::read_borrowed_message;
use crate::identity::LibraryIdentity;

/// Raw lifecycle entry points of a native subsystem.
///
/// Implementations return the native status verbatim; interpreting it is the
/// [`LifecycleManager`](crate::LifecycleManager)'s job. Only the manager may
/// call [`startup`](Self::startup) and [`cleanup`](Self::cleanup).
pub trait Boundary: Send + Sync + fmt::Debug {
    /// Start the native subsystem. `0` on success, `-1` on failure.
    fn startup(&self) -> i32;

    /// Tear the native subsystem down. `0` on success, `-1` on failure.
    fn cleanup(&self) -> i32;

    /// Description of the most recent native failure on this thread.
    fn last_error(&self) -> Option<String> {
        None
    }

    /// Human-readable text for a native error number.
    fn describe(&self, errno: u32) -> Option<String> {
        let _ = errno;
        None
    }
}

impl<B: Boundary + ?Sized> Boundary for Box<B> {
    fn startup(&self) -> i32 {
        (**self).startup()
    }

    fn cleanup(&self) -> i32 {
        (**self).cleanup()
    }

    fn last_error(&self) -> Option<String> {
        (**self).last_error()
    }

    fn describe(&self, errno: u32) -> Option<String> {
        (**self).describe(errno)
    }
}

/// The binding shim, opened at runtime from a resolved [`LibraryIdentity`].
///
/// The core library is opened first so the shim's dependency on it is
/// satisfied from the same directory; both stay loaded for the lifetime of
/// this value.
pub struct NativeBoundary {
    identity: LibraryIdentity,
    startup: sys::csllbc_Startup,
    cleanup: sys::csllbc_Cleanup,
    format_last_error: Option<sys::csllbc_FormatLastError>,
    str_error: Option<sys::csllbc_StrError>,
    // Declared after the fn pointers: dropped last, shim before core.
    _shim: Library,
    _core: Library,
}

impl NativeBoundary {
    /// Open the core library and binding shim named by `identity`.
    pub fn load(identity: LibraryIdentity) -> Result<Self> {
        let core = open(&identity.core_path())?;
        let shim = open(&identity.shim_path())?;

        let startup = unsafe { required::<sys::csllbc_Startup>(&shim, sys::SYM_STARTUP)? };
        let cleanup = unsafe { required::<sys::csllbc_Cleanup>(&shim, sys::SYM_CLEANUP)? };
        let format_last_error =
            unsafe { optional::<sys::csllbc_FormatLastError>(&shim, sys::SYM_FORMAT_LAST_ERROR) };
        let str_error = unsafe { optional::<sys::csllbc_StrError>(&shim, sys::SYM_STR_ERROR) };

        tracing::debug!(
            %identity,
            last_error = format_last_error.is_some(),
            str_error = str_error.is_some(),
            "native boundary loaded"
        );

        Ok(Self {
            identity,
            startup,
            cleanup,
            format_last_error,
            str_error,
            _shim: shim,
            _core: core,
        })
    }

    /// Identity the libraries were loaded from.
    #[must_use]
    pub const fn identity(&self) -> &LibraryIdentity {
        &self.identity
    }
}

impl Boundary for NativeBoundary {
    fn startup(&self) -> i32 {
        unsafe { (self.startup)() }
    }

    fn cleanup(&self) -> i32 {
        unsafe { (self.cleanup)() }
    }

    fn last_error(&self) -> Option<String> {
        let f = self.format_last_error?;
        let mut len: c_int = 0;
        let ptr = unsafe { f(&mut len) };
        unsafe { read_borrowed_message(ptr, len) }
    }

    fn describe(&self, errno: u32) -> Option<String> {
        let f = self.str_error?;
        let mut len: c_int = 0;
        let ptr = unsafe { f(errno, &mut len) };
        unsafe { read_borrowed_message(ptr, len) }
    }
}

impl fmt::Debug for NativeBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBoundary")
            .field("identity", &self.identity)
            .field("last_error", &self.format_last_error.is_some())
            .field("str_error", &self.str_error.is_some())
            .finish_non_exhaustive()
    }
}

fn open(path: &std::path::Path) -> Result<Library> {
    // Runs the library's static initializers only; csllbc_Startup does the real work.
    unsafe { Library::new(path) }.map_err(|source| LifecycleError::LibraryLoad {
        library: path.display().to_string(),
        source,
    })
}

/// Look up a function pointer that must be present.
///
/// # Safety
///
/// `T` must be the correct function-pointer type for `symbol`.
unsafe fn required<T: Copy>(lib: &Library, symbol: &'static [u8]) -> Result<T> {
    unsafe { lib.get::<T>(symbol) }
        .map(|sym| *sym)
        .map_err(|source| LifecycleError::MissingSymbol {
            symbol: sys::symbol_name(symbol),
            source,
        })
}

/// Look up a function pointer that older shims may not export.
///
/// # Safety
///
/// `T` must be the correct function-pointer type for `symbol`.
unsafe fn optional<T: Copy>(lib: &Library, symbol: &'static [u8]) -> Option<T> {
    match unsafe { lib.get::<T>(symbol) } {
        Ok(sym) => Some(*sym),
        Err(e) => {
            tracing::debug!(
                symbol = sys::symbol_name(symbol),
                error = %e,
                "optional symbol absent"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::BuildVariant;

    #[test]
    fn load_reports_missing_library_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let identity = LibraryIdentity::new(
            BuildVariant::Release,
            "llbc_absent",
            "csllbc_absent",
            Some(dir.path().to_path_buf()),
        );
        let err = NativeBoundary::load(identity).expect_err("nothing to load");
        match err {
            LifecycleError::LibraryLoad { library, .. } => {
                assert!(library.contains("llbc_absent"), "{library}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[derive(Debug)]
    struct Bare;

    impl Boundary for Bare {
        fn startup(&self) -> i32 {
            0
        }

        fn cleanup(&self) -> i32 {
            0
        }
    }

    #[test]
    fn diagnostics_default_to_none() {
        let boxed: Box<dyn Boundary> = Box::new(Bare);
        assert_eq!(boxed.last_error(), None);
        assert_eq!(boxed.describe(4), None);
        assert_eq!(boxed.startup(), 0);
    }
}

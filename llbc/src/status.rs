//! Status codes returned across the native boundary, and the lifecycle state.

use std::fmt;

macro_rules! ffi_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($(#[$vm:meta])* $variant:ident = $val:literal),* $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name { $($(#[$vm])* $variant = $val),* }

        impl $name {
            /// Convert from FFI `i32`. Returns `None` for unknown values.
            #[must_use]
            pub const fn from_ffi(v: i32) -> Option<Self> {
                match v { $($val => Some(Self::$variant),)* _ => None }
            }

            /// The raw FFI value.
            #[must_use]
            pub const fn to_ffi(self) -> i32 {
                self as i32
            }
        }
    };
}

ffi_enum! {
    /// Result of a boundary call. No other values are defined.
    pub enum StatusCode {
        /// `LLBC_OK`.
        Ok = 0,
        /// `LLBC_FAILED`.
        Failed = -1,
    }
}

/// Process-wide state of the native subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Startup has never succeeded.
    #[default]
    Uninitialized,
    /// The native subsystem is running.
    Started,
    /// A cleanup was attempted after a successful startup.
    CleanedUp,
}

impl LifecycleState {
    /// Lowercase name, as used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Started => "started",
            Self::CleanedUp => "cleaned-up",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which boundary call produced a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryCall {
    /// `csllbc_Startup`.
    Startup,
    /// `csllbc_Cleanup`.
    Cleanup,
}

impl fmt::Display for BoundaryCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Startup => "startup",
            Self::Cleanup => "cleanup",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_two_status_values_are_defined() {
        assert_eq!(StatusCode::from_ffi(0), Some(StatusCode::Ok));
        assert_eq!(StatusCode::from_ffi(-1), Some(StatusCode::Failed));
        assert_eq!(StatusCode::from_ffi(1), None);
        assert_eq!(StatusCode::from_ffi(-2), None);
        assert_eq!(StatusCode::from_ffi(i32::MIN), None);
    }

    #[test]
    fn status_values_match_native_constants() {
        assert_eq!(StatusCode::Ok.to_ffi(), llbc_sys::LLBC_OK);
        assert_eq!(StatusCode::Failed.to_ffi(), llbc_sys::LLBC_FAILED);
    }

    #[test]
    fn state_defaults_to_uninitialized() {
        assert_eq!(LifecycleState::default(), LifecycleState::Uninitialized);
        assert_eq!(LifecycleState::CleanedUp.to_string(), "cleaned-up");
    }
}

//! Error taxonomy for the lifecycle gate.

use crate::status::BoundaryCall;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Top-level error type for the lifecycle gate.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Native startup reported `LLBC_FAILED`. The state is unchanged.
    #[error("native startup failed{}", detail(.reason.as_deref()))]
    NativeStartupFailed {
        /// Text from the native last-error slot, if the shim exposes one.
        reason: Option<String>,
    },

    /// Native cleanup reported `LLBC_FAILED`. The state still moved to cleaned-up.
    #[error("native cleanup failed{}", detail(.reason.as_deref()))]
    NativeCleanupFailed {
        /// Text from the native last-error slot, if the shim exposes one.
        reason: Option<String>,
    },

    /// A boundary call returned something other than `LLBC_OK` / `LLBC_FAILED`.
    #[error("native {call} returned unexpected status code {code}")]
    UnexpectedStatusCode {
        /// The call that misbehaved.
        call: BoundaryCall,
        /// The raw value it returned.
        code: i32,
    },

    /// A native library could not be opened.
    #[error("load {library}: {source}")]
    LibraryLoad {
        /// Path or name that was passed to the loader.
        library: String,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// A required symbol is missing from the binding shim.
    #[error("missing symbol {symbol}: {source}")]
    MissingSymbol {
        /// Symbol name.
        symbol: &'static str,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// A configuration value could not be parsed.
    #[error("config: {0}")]
    InvalidConfig(String),

    /// Reading or writing a configuration file failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A manager was already installed in the process context.
    #[error("a lifecycle manager is already installed for this process")]
    AlreadyInstalled,

    /// No manager has been installed in the process context.
    #[error("no lifecycle manager installed; call context::install() first")]
    NotInstalled,
}

fn detail(reason: Option<&str>) -> String {
    reason.map_or_else(String::new, |r| format!(": {r}"))
}

impl LifecycleError {
    /// Whether retrying the same call later can reasonably succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NativeStartupFailed { .. }
                | Self::UnexpectedStatusCode {
                    call: BoundaryCall::Startup,
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_native_reason() {
        let err = LifecycleError::NativeStartupFailed {
            reason: Some("socket init failed".into()),
        };
        assert_eq!(err.to_string(), "native startup failed: socket init failed");

        let err = LifecycleError::NativeCleanupFailed { reason: None };
        assert_eq!(err.to_string(), "native cleanup failed");
    }

    #[test]
    fn unexpected_status_names_the_call() {
        let err = LifecycleError::UnexpectedStatusCode {
            call: BoundaryCall::Cleanup,
            code: 7,
        };
        assert_eq!(err.to_string(), "native cleanup returned unexpected status code 7");
        assert!(!err.is_retryable());
    }

    #[test]
    fn only_startup_failures_are_retryable() {
        assert!(LifecycleError::NativeStartupFailed { reason: None }.is_retryable());
        assert!(!LifecycleError::NativeCleanupFailed { reason: None }.is_retryable());
        assert!(!LifecycleError::AlreadyInstalled.is_retryable());
    }
}

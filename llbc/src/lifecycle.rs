//! The lifecycle gate around native startup and cleanup.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::boundary::{Boundary, NativeBoundary};
use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, Result};
use crate::status::{BoundaryCall, LifecycleState, StatusCode};

/// Idempotent, thread-safe gate around a native subsystem's start and stop.
///
/// Owns the [`LifecycleState`]. Both transitions run the boundary call while
/// holding the state lock, so concurrent callers serialize and the native
/// side never sees overlapping or repeated init/fini calls. Callers that
/// queued behind a failed startup attempt receive that attempt's error
/// instead of calling native startup again.
pub struct LifecycleManager {
    boundary: Box<dyn Boundary>,
    gate: Mutex<Gate>,
    /// Completed native startup attempts.
    attempts: AtomicU64,
}

#[derive(Debug, Default)]
struct Gate {
    state: LifecycleState,
    /// Outcome of the latest startup attempt, if it failed.
    last_failure: Option<StartupFailure>,
}

#[derive(Debug, Clone)]
enum StartupFailure {
    Failed(Option<String>),
    Unexpected(i32),
}

impl StartupFailure {
    fn to_error(&self) -> LifecycleError {
        match self {
            Self::Failed(reason) => LifecycleError::NativeStartupFailed {
                reason: reason.clone(),
            },
            Self::Unexpected(code) => LifecycleError::UnexpectedStatusCode {
                call: BoundaryCall::Startup,
                code: *code,
            },
        }
    }
}

impl LifecycleManager {
    /// Wrap an already loaded boundary. The state starts `Uninitialized`.
    pub fn new(boundary: impl Boundary + 'static) -> Self {
        Self {
            boundary: Box::new(boundary),
            gate: Mutex::new(Gate::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Resolve `config`, load the native libraries and wrap them.
    pub fn from_config(config: &LifecycleConfig) -> Result<Self> {
        let identity = config.resolve();
        tracing::debug!(%identity, "resolving native boundary");
        Ok(Self::new(NativeBoundary::load(identity)?))
    }

    /// Start the native subsystem if it is not already running.
    ///
    /// A no-op when already `Started`. On failure the state is left as it was,
    /// so the call can be retried; callers that were already waiting when the
    /// failed attempt ran share its error.
    pub fn startup(&self) -> Result<()> {
        self.start().map(|_| ())
    }

    /// Returns `true` if this call made the transition to `Started`.
    fn start(&self) -> Result<bool> {
        let ticket = self.attempts.load(Ordering::Acquire);
        let mut gate = self.lock();
        if gate.state == LifecycleState::Started {
            tracing::debug!("startup: already started");
            return Ok(false);
        }
        if self.attempts.load(Ordering::Acquire) != ticket
            && let Some(failure) = &gate.last_failure
        {
            tracing::debug!("startup: sharing outcome of concurrent attempt");
            return Err(failure.to_error());
        }

        let prev = gate.state;
        let code = self.boundary.startup();
        let outcome = match StatusCode::from_ffi(code) {
            Some(StatusCode::Ok) => {
                tracing::info!(from = %prev, "native subsystem started");
                gate.state = LifecycleState::Started;
                gate.last_failure = None;
                Ok(true)
            }
            Some(StatusCode::Failed) => {
                let reason = self.boundary.last_error();
                tracing::warn!(state = %prev, reason = reason.as_deref(), "native startup failed");
                Err(StartupFailure::Failed(reason))
            }
            None => {
                tracing::warn!(state = %prev, code, "native startup returned unknown status");
                Err(StartupFailure::Unexpected(code))
            }
        };
        self.attempts.fetch_add(1, Ordering::Release);

        outcome.map_err(|failure| {
            let err = failure.to_error();
            gate.last_failure = Some(failure);
            err
        })
    }

    /// Stop the native subsystem if it is running.
    ///
    /// A no-op unless `Started`. Otherwise the native cleanup runs once and the
    /// state becomes `CleanedUp` whatever it returns; a failure is still
    /// reported to the caller.
    pub fn cleanup(&self) -> Result<()> {
        let mut gate = self.lock();
        let prev = gate.state;
        if prev != LifecycleState::Started {
            tracing::debug!(state = %prev, "cleanup: not started");
            return Ok(());
        }

        let code = self.boundary.cleanup();
        gate.state = LifecycleState::CleanedUp;
        match StatusCode::from_ffi(code) {
            Some(StatusCode::Ok) => {
                tracing::info!("native subsystem cleaned up");
                Ok(())
            }
            Some(StatusCode::Failed) => {
                let reason = self.boundary.last_error();
                tracing::warn!(
                    reason = reason.as_deref(),
                    "native cleanup failed; state advanced anyway"
                );
                Err(LifecycleError::NativeCleanupFailed { reason })
            }
            None => {
                tracing::warn!(
                    code,
                    "native cleanup returned unknown status; state advanced anyway"
                );
                Err(LifecycleError::UnexpectedStatusCode {
                    call: BoundaryCall::Cleanup,
                    code,
                })
            }
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.lock().state
    }

    /// Whether the native subsystem is running.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state() == LifecycleState::Started
    }

    /// Start the subsystem and return a guard that cleans it up on drop.
    ///
    /// If the subsystem was already running, the guard belongs to whoever
    /// started it and dropping the guard leaves it running.
    pub fn session(&self) -> Result<Session<'_>> {
        let owned = self.start()?;
        Ok(Session {
            manager: self,
            owned,
        })
    }

    /// Human-readable text for a native error number, if the shim provides one.
    #[must_use]
    pub fn describe_error(&self, errno: u32) -> Option<String> {
        self.boundary.describe(errno)
    }

    /// A panicking boundary leaves the state exactly as it was before the
    /// call, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("boundary", &self.boundary)
            .field("state", &self.gate.try_lock().ok().map(|g| g.state))
            .finish()
    }
}

/// RAII guard returned by [`LifecycleManager::session`].
///
/// If the session's own startup brought the subsystem up, dropping it runs
/// [`LifecycleManager::cleanup`] and logs any failure. Use
/// [`finish`](Self::finish) to observe the cleanup result instead.
#[must_use = "dropping the session cleans up the native subsystem immediately"]
pub struct Session<'a> {
    manager: &'a LifecycleManager,
    owned: bool,
}

impl Session<'_> {
    /// Whether this session started the subsystem and will clean it up.
    #[must_use]
    pub const fn owns_subsystem(&self) -> bool {
        self.owned
    }

    /// Clean up now (if this session started the subsystem) and return the result.
    pub fn finish(mut self) -> Result<()> {
        if !std::mem::replace(&mut self.owned, false) {
            return Ok(());
        }
        self.manager.cleanup()
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        if let Err(e) = self.manager.cleanup() {
            tracing::warn!(error = %e, "cleanup on session drop failed");
        }
    }
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("owned", &self.owned)
            .field("state", &self.manager.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Scripted {
        startup_rc: AtomicI32,
        cleanup_rc: AtomicI32,
        startups: AtomicUsize,
        cleanups: AtomicUsize,
    }

    impl Boundary for &'static Scripted {
        fn startup(&self) -> i32 {
            self.startups.fetch_add(1, Ordering::SeqCst);
            self.startup_rc.load(Ordering::SeqCst)
        }

        fn cleanup(&self) -> i32 {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
            self.cleanup_rc.load(Ordering::SeqCst)
        }

        fn last_error(&self) -> Option<String> {
            Some("scripted failure".into())
        }
    }

    fn scripted() -> &'static Scripted {
        Box::leak(Box::default())
    }

    #[test]
    fn poisoned_lock_keeps_previous_state() {
        #[derive(Debug)]
        struct Panicky;
        impl Boundary for Panicky {
            fn startup(&self) -> i32 {
                panic!("native crash")
            }
            fn cleanup(&self) -> i32 {
                0
            }
        }

        let manager = LifecycleManager::new(Panicky);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| manager.startup()));
        assert!(res.is_err());
        assert_eq!(manager.state(), LifecycleState::Uninitialized);
        assert!(manager.cleanup().is_ok());
    }

    #[test]
    fn failure_reason_comes_from_last_error() {
        let native = scripted();
        native.startup_rc.store(-1, Ordering::SeqCst);
        let manager = LifecycleManager::new(native);
        match manager.startup() {
            Err(LifecycleError::NativeStartupFailed { reason }) => {
                assert_eq!(reason.as_deref(), Some("scripted failure"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn finish_reports_cleanup_failure() {
        let native = scripted();
        native.cleanup_rc.store(-1, Ordering::SeqCst);
        let manager = LifecycleManager::new(native);
        let session = manager.session().expect("startup");
        assert!(matches!(
            session.finish(),
            Err(LifecycleError::NativeCleanupFailed { .. })
        ));
        assert_eq!(manager.state(), LifecycleState::CleanedUp);
        assert_eq!(native.cleanups.load(Ordering::SeqCst), 1);
    }
}

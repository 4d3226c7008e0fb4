//! Process-scoped context: the one manager every entry point of the process shares.
//!
//! Static initializers, explicit API calls and shutdown hooks may all want to
//! start or stop the native subsystem. Installing a single manager here makes
//! that shared dependency explicit; code that can take a `&LifecycleManager`
//! directly should still prefer that.

use std::sync::OnceLock;

use crate::error::{LifecycleError, Result};
use crate::lifecycle::LifecycleManager;

static PROCESS: OnceLock<LifecycleManager> = OnceLock::new();

/// Install `manager` as the process-wide manager.
///
/// Fails with [`LifecycleError::AlreadyInstalled`] if one is already set; the
/// rejected manager is dropped without touching the native side.
pub fn install(manager: LifecycleManager) -> Result<&'static LifecycleManager> {
    let mut fresh = false;
    let installed = PROCESS.get_or_init(|| {
        fresh = true;
        manager
    });
    if !fresh {
        return Err(LifecycleError::AlreadyInstalled);
    }
    tracing::debug!("process lifecycle manager installed");
    Ok(installed)
}

/// The installed manager, if any.
#[must_use]
pub fn current() -> Option<&'static LifecycleManager> {
    PROCESS.get()
}

/// [`LifecycleManager::startup`] on the installed manager.
pub fn startup() -> Result<()> {
    current().ok_or(LifecycleError::NotInstalled)?.startup()
}

/// [`LifecycleManager::cleanup`] on the installed manager.
pub fn cleanup() -> Result<()> {
    current().ok_or(LifecycleError::NotInstalled)?.cleanup()
}

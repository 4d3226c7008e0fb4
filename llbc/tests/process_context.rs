// Process-wide context: one test, since the installed manager lives for the whole process.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use llbc::{Boundary, LifecycleError, LifecycleManager, LifecycleState, context};

#[derive(Debug, Clone, Default)]
struct CountingNative(Arc<AtomicUsize>);

impl Boundary for CountingNative {
    fn startup(&self) -> i32 {
        self.0.fetch_add(1, Ordering::SeqCst);
        llbc_sys::LLBC_OK
    }

    fn cleanup(&self) -> i32 {
        llbc_sys::LLBC_OK
    }
}

#[test]
fn install_once_then_share() {
    assert!(context::current().is_none());
    assert!(matches!(context::startup(), Err(LifecycleError::NotInstalled)));
    assert!(matches!(context::cleanup(), Err(LifecycleError::NotInstalled)));

    let native = CountingNative::default();
    let installed = context::install(LifecycleManager::new(native.clone())).expect("install");

    // Two entry points, one native startup.
    context::startup().expect("startup via context");
    installed.startup().expect("startup via handle");
    assert_eq!(native.0.load(Ordering::SeqCst), 1);

    let other = CountingNative::default();
    let err = context::install(LifecycleManager::new(other.clone())).expect_err("second install");
    assert!(matches!(err, LifecycleError::AlreadyInstalled));
    assert_eq!(other.0.load(Ordering::SeqCst), 0);

    context::cleanup().expect("cleanup");
    let current = context::current().expect("still installed");
    assert_eq!(current.state(), LifecycleState::CleanedUp);
}

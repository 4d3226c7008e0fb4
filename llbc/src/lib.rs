#![doc = include_str!("../README.md")]

pub mod boundary;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod status;

mod ffi;

// Re-export core public API at crate root.
pub use boundary::{Boundary, NativeBoundary};
pub use config::LifecycleConfig;
pub use error::{LifecycleError, Result};
pub use identity::{BuildVariant, LibraryIdentity};
pub use lifecycle::{LifecycleManager, Session};
pub use status::{BoundaryCall, LifecycleState, StatusCode};

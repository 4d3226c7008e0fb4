//! Native library identity: which core library and binding shim to load.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::LifecycleError;

/// Prefix the native build puts on every library, Windows included.
const LIB_PREFIX: &str = "lib";

/// Debug or release flavour of the native libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildVariant {
    /// Optimized libraries (`llbc`, `csllbc_native`).
    Release,
    /// Debug libraries (`llbc_debug`, `csllbc_native_debug`).
    Debug,
}

impl BuildVariant {
    /// Variant matching the profile `llbc-sys` was compiled with.
    #[must_use]
    pub fn build_default() -> Self {
        llbc_sys::DEFAULT_VARIANT.parse().unwrap_or(Self::Debug)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }

    /// Default core library base name for this variant.
    #[must_use]
    pub const fn core_name(self) -> &'static str {
        match self {
            Self::Release => llbc_sys::CORE_LIB_NAME,
            Self::Debug => llbc_sys::CORE_LIB_NAME_DEBUG,
        }
    }

    /// Default binding shim base name for this variant.
    #[must_use]
    pub const fn shim_name(self) -> &'static str {
        match self {
            Self::Release => llbc_sys::NATIVE_LIB_NAME,
            Self::Debug => llbc_sys::NATIVE_LIB_NAME_DEBUG,
        }
    }
}

impl Default for BuildVariant {
    fn default() -> Self {
        Self::build_default()
    }
}

impl FromStr for BuildVariant {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "release" | "rel" => Ok(Self::Release),
            "debug" | "dbg" => Ok(Self::Debug),
            _ => Err(LifecycleError::InvalidConfig(format!(
                "unknown variant: {s} (expected: debug, release)"
            ))),
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved (core, shim) library pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryIdentity {
    variant: BuildVariant,
    core: String,
    shim: String,
    dir: Option<PathBuf>,
}

impl LibraryIdentity {
    /// Default names for `variant`, looked up through the platform search path.
    #[must_use]
    pub fn for_variant(variant: BuildVariant) -> Self {
        Self::new(variant, variant.core_name(), variant.shim_name(), None)
    }

    /// Explicit names, optionally anchored to `dir`.
    #[must_use]
    pub fn new(
        variant: BuildVariant,
        core: impl Into<String>,
        shim: impl Into<String>,
        dir: Option<PathBuf>,
    ) -> Self {
        Self {
            variant,
            core: core.into(),
            shim: shim.into(),
            dir,
        }
    }

    /// Variant these names were resolved for.
    #[must_use]
    pub const fn variant(&self) -> BuildVariant {
        self.variant
    }

    /// Core library base name (no platform prefix or suffix).
    #[must_use]
    pub fn core(&self) -> &str {
        &self.core
    }

    /// Binding shim base name (no platform prefix or suffix).
    #[must_use]
    pub fn shim(&self) -> &str {
        &self.shim
    }

    /// Directory the libraries are loaded from, if pinned.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Platform file name or path of the core library, e.g. `libllbc.so`.
    #[must_use]
    pub fn core_path(&self) -> PathBuf {
        self.locate(&self.core)
    }

    /// Platform file name or path of the binding shim, e.g. `libcsllbc_native.dll`.
    #[must_use]
    pub fn shim_path(&self) -> PathBuf {
        self.locate(&self.shim)
    }

    fn locate(&self, name: &str) -> PathBuf {
        let file = file_name(name, std::env::consts::DLL_SUFFIX);
        match &self.dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

/// `lib<name><suffix>`; a name that already carries the prefix keeps it.
fn file_name(name: &str, suffix: &str) -> String {
    if name.starts_with(LIB_PREFIX) {
        format!("{name}{suffix}")
    } else {
        format!("{LIB_PREFIX}{name}{suffix}")
    }
}

impl fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.variant, self.core, self.shim)
    }
}

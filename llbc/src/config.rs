//! Runtime configuration: resolved once at process start, then handed to the manager.
//!
//! Sources, lowest to highest precedence: built-in defaults, a `key = value`
//! config file, `LLBC_*` environment variables, explicit setters (CLI flags).

use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::{LifecycleError, Result};
use crate::identity::{BuildVariant, LibraryIdentity};

/// Selects the native variant.
pub const ENV_VARIANT: &str = "LLBC_VARIANT";
/// Directory containing both native libraries.
pub const ENV_LIB_DIR: &str = "LLBC_LIB_DIR";
/// Explicit core library base name.
pub const ENV_CORE_LIB: &str = "LLBC_CORE_LIB";
/// Explicit binding shim base name.
pub const ENV_SHIM_LIB: &str = "LLBC_SHIM_LIB";

/// Unresolved library configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Native variant; selects default library names.
    pub variant: BuildVariant,
    /// Directory to load both libraries from (platform search path if `None`).
    pub lib_dir: Option<PathBuf>,
    /// Overrides the variant's core library name.
    pub core_name: Option<String>,
    /// Overrides the variant's binding shim name.
    pub shim_name: Option<String>,
}

impl LifecycleConfig {
    /// Defaults overlaid with `LLBC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values found through `lookup` (normally [`env::var`]).
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_VARIANT) {
            self.variant = v.parse()?;
        }
        if let Some(v) = get(ENV_LIB_DIR) {
            self.lib_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_CORE_LIB) {
            self.core_name = Some(v);
        }
        if let Some(v) = get(ENV_SHIM_LIB) {
            self.shim_name = Some(v);
        }
        Ok(())
    }

    /// Load from a `key = value` file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        match fs::read_to_string(path) {
            Ok(text) => config.apply_text(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(config)
    }

    /// Overlay `key = value` lines. Blank lines and `#` comments are skipped.
    pub fn apply_text(&mut self, text: &str) -> Result<()> {
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (k, v) = line.split_once('=').ok_or_else(|| {
                LifecycleError::InvalidConfig(format!("line {}: expected key = value", n + 1))
            })?;
            self.set(k.trim(), v.trim())?;
        }
        Ok(())
    }

    /// Set one key by name (`variant`, `lib_dir`, `core`, `shim`).
    ///
    /// An empty value clears an optional key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let opt = || (!value.is_empty()).then(|| value.to_owned());
        match key {
            "variant" => self.variant = value.parse()?,
            "lib_dir" => self.lib_dir = opt().map(PathBuf::from),
            "core" => self.core_name = opt(),
            "shim" => self.shim_name = opt(),
            _ => {
                return Err(LifecycleError::InvalidConfig(format!(
                    "unknown key: {key} (expected: variant, lib_dir, core, shim)"
                )));
            }
        }
        Ok(())
    }

    /// Persist as a `key = value` file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Render in the file format read by [`apply_text`](Self::apply_text).
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!("variant = {}\n", self.variant);
        if let Some(dir) = &self.lib_dir {
            out.push_str(&format!("lib_dir = {}\n", dir.display()));
        }
        if let Some(core) = &self.core_name {
            out.push_str(&format!("core = {core}\n"));
        }
        if let Some(shim) = &self.shim_name {
            out.push_str(&format!("shim = {shim}\n"));
        }
        out
    }

    /// Resolve into the immutable identity passed to the boundary loader.
    #[must_use]
    pub fn resolve(&self) -> LibraryIdentity {
        LibraryIdentity::new(
            self.variant,
            self.core_name
                .clone()
                .unwrap_or_else(|| self.variant.core_name().to_owned()),
            self.shim_name
                .clone()
                .unwrap_or_else(|| self.variant.shim_name().to_owned()),
            self.lib_dir.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_resolve_to_variant_names() {
        let config = LifecycleConfig {
            variant: BuildVariant::Release,
            ..LifecycleConfig::default()
        };
        let id = config.resolve();
        assert_eq!(id.core(), "llbc");
        assert_eq!(id.shim(), "csllbc_native");
        assert_eq!(id.dir(), None);
    }

    #[test]
    fn env_overrides_variant_and_names() {
        let mut config = LifecycleConfig::default();
        config
            .apply_env(lookup(&[
                (ENV_VARIANT, "debug"),
                (ENV_LIB_DIR, "/opt/llbc"),
                (ENV_SHIM_LIB, "my_shim"),
                (ENV_CORE_LIB, "  "),
            ]))
            .expect("env");
        let id = config.resolve();
        assert_eq!(id.variant(), BuildVariant::Debug);
        assert_eq!(id.core(), "llbc_debug");
        assert_eq!(id.shim(), "my_shim");
        assert_eq!(id.dir(), Some(Path::new("/opt/llbc")));
    }

    #[test]
    fn bad_env_variant_is_rejected() {
        let mut config = LifecycleConfig::default();
        let err = config
            .apply_env(lookup(&[(ENV_VARIANT, "turbo")]))
            .expect_err("bad variant");
        assert!(matches!(err, LifecycleError::InvalidConfig(_)));
    }

    #[test]
    fn text_format_skips_comments_and_reports_line() {
        let mut config = LifecycleConfig::default();
        config
            .apply_text("# native libs\n\nvariant = release\ncore = llbc_custom\n")
            .expect("parse");
        assert_eq!(config.variant, BuildVariant::Release);
        assert_eq!(config.core_name.as_deref(), Some("llbc_custom"));

        let err = config.apply_text("variant = debug\nnonsense\n").expect_err("bad line");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = LifecycleConfig::default();
        assert!(config.set("colour", "blue").is_err());
    }

    #[test]
    fn empty_value_clears_optional_key() {
        let mut config = LifecycleConfig::default();
        config.set("lib_dir", "/tmp/x").expect("set");
        config.set("lib_dir", "").expect("clear");
        assert_eq!(config.lib_dir, None);
    }

    #[test]
    fn text_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("llbc.conf");
        let config = LifecycleConfig {
            variant: BuildVariant::Debug,
            lib_dir: Some(PathBuf::from("/usr/local/lib")),
            core_name: None,
            shim_name: Some("csllbc_native_custom".into()),
        };
        config.save(&path).expect("save");
        assert_eq!(LifecycleConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LifecycleConfig::load(&dir.path().join("absent.conf")).expect("load");
        assert_eq!(config, LifecycleConfig::default());
    }
}

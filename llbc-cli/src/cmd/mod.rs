//! CLI argument definitions and subcommand routing.

pub mod config;
pub mod inspect;
pub mod probe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use llbc::{BuildVariant, LifecycleConfig};

/// Inspect and exercise the llbc native libraries.
#[derive(Parser)]
#[command(name = "llbc", version, about)]
pub struct Cli {
    /// Native variant (overrides config file and `LLBC_VARIANT`).
    #[arg(long, global = true, value_parser = parse_variant)]
    pub variant: Option<BuildVariant>,

    /// Directory holding the native libraries (overrides `LLBC_LIB_DIR`).
    #[arg(long, global = true)]
    pub lib_dir: Option<PathBuf>,

    /// Config file to read instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log lifecycle transitions (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// One-shot operations.
#[derive(Subcommand)]
pub enum Command {
    /// Show the resolved library identity.
    #[command(alias = "id")]
    Identity {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Load the libraries, start the native subsystem, then clean it up.
    Probe {
        /// Repeat startup/cleanup this many times.
        #[arg(short = 'n', long, default_value = "1")]
        cycles: u32,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Describe a native error number.
    Describe {
        /// Native error number.
        errno: u32,
    },
    /// Show or change the persisted configuration.
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// `config` subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (default).
    Show,
    /// Print the config file path.
    Path,
    /// Set a key (`variant`, `lib_dir`, `core`, `shim`). An empty value clears it.
    Set {
        /// Key name.
        key: String,
        /// New value.
        value: String,
    },
}

impl Cli {
    /// Effective configuration: file < environment < flags.
    pub fn lifecycle_config(&self) -> llbc::Result<LifecycleConfig> {
        let path = self.config_path();
        let mut cfg = LifecycleConfig::load(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        if let Some(variant) = self.variant {
            cfg.variant = variant;
        }
        if let Some(dir) = &self.lib_dir {
            cfg.lib_dir = Some(dir.clone());
        }
        Ok(cfg)
    }

    /// Config file in use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config::default_path)
    }
}

pub fn parse_variant(s: &str) -> Result<BuildVariant, String> {
    s.parse().map_err(|e: llbc::LifecycleError| e.to_string())
}

//! Config file persistence.

use std::path::{Path, PathBuf};

use llbc::LifecycleConfig;

use super::{Cli, ConfigAction};

/// Base config directory for the CLI.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("llbc")
}

/// Default config file location.
pub fn default_path() -> PathBuf {
    config_dir().join("llbc.conf")
}

/// Run a `config` subcommand.
pub fn run(cli: &Cli, action: Option<&ConfigAction>) -> llbc::Result<()> {
    let path = cli.config_path();
    match action {
        None | Some(ConfigAction::Show) => show(cli, &path),
        Some(ConfigAction::Path) => {
            println!("{}", path.display());
            Ok(())
        }
        Some(ConfigAction::Set { key, value }) => set(&path, key, value),
    }
}

fn show(cli: &Cli, path: &Path) -> llbc::Result<()> {
    let cfg = cli.lifecycle_config()?;
    println!("# effective configuration (file: {})", path.display());
    print!("{}", cfg.to_text());
    Ok(())
}

/// Update only the file layer; environment and flags are not persisted.
fn set(path: &Path, key: &str, value: &str) -> llbc::Result<()> {
    let mut cfg = LifecycleConfig::load(path)?;
    cfg.set(key, value)?;
    cfg.save(path)?;
    println!("Saved {key} to {}", path.display());
    Ok(())
}

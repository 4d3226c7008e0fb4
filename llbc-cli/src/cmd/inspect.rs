//! Identity and error inspection commands.

use llbc::{LibraryIdentity, LifecycleManager};

use super::Cli;

/// Print the resolved library identity.
pub fn identity(cli: &Cli, json: bool) -> llbc::Result<()> {
    let id = cli.lifecycle_config()?.resolve();
    if json {
        println!("{}", identity_json(&id));
        return Ok(());
    }
    println!("Variant:       {}", id.variant());
    println!("Core library:  {} ({})", id.core(), id.core_path().display());
    println!("Binding shim:  {} ({})", id.shim(), id.shim_path().display());
    match id.dir() {
        Some(dir) => println!("Directory:     {}", dir.display()),
        None => println!("Directory:     (platform search path)"),
    }
    Ok(())
}

pub fn identity_json(id: &LibraryIdentity) -> serde_json::Value {
    serde_json::json!({
        "variant": id.variant().as_str(),
        "core": id.core(),
        "core_path": id.core_path().display().to_string(),
        "shim": id.shim(),
        "shim_path": id.shim_path().display().to_string(),
        "dir": id.dir().map(|d| d.display().to_string()),
    })
}

/// Ask the binding shim to describe a native error number.
pub fn describe(cli: &Cli, errno: u32) -> llbc::Result<()> {
    let manager = LifecycleManager::from_config(&cli.lifecycle_config()?)?;
    match manager.describe_error(errno) {
        Some(text) => println!("{errno}: {text}"),
        None => println!("{errno}: (no description available from native library)"),
    }
    Ok(())
}

//! Probe: drive a real native library through the lifecycle gate.

use llbc::{LifecycleError, LifecycleManager, context};

use super::Cli;
use super::inspect::identity_json;

/// One startup/cleanup cycle as observed through the manager.
struct Cycle {
    startup: Result<(), LifecycleError>,
    cleanup: Result<(), LifecycleError>,
    state: llbc::LifecycleState,
}

/// Load the configured libraries, then start and clean up `cycles` times.
///
/// The manager is installed in the process context so every cycle goes through
/// the same gate a long-running host would use.
pub fn run(cli: &Cli, cycles: u32, json: bool) -> llbc::Result<()> {
    let cfg = cli.lifecycle_config()?;
    let identity = cfg.resolve();
    let manager = context::install(LifecycleManager::from_config(&cfg)?)?;

    let results: Vec<Cycle> = (0..cycles.max(1))
        .map(|_| {
            let startup = manager.startup();
            let cleanup = manager.cleanup();
            Cycle {
                startup,
                cleanup,
                state: manager.state(),
            }
        })
        .collect();

    if json {
        let rows: Vec<_> = results
            .iter()
            .map(|c| {
                serde_json::json!({
                    "startup": outcome(&c.startup),
                    "cleanup": outcome(&c.cleanup),
                    "state": c.state.as_str(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({ "identity": identity_json(&identity), "cycles": rows })
        );
    } else {
        println!("Probing {identity}");
        for (i, c) in results.iter().enumerate() {
            println!(
                "  {}  startup: {:<28} cleanup: {:<28} state: {}",
                i + 1,
                outcome(&c.startup),
                outcome(&c.cleanup),
                c.state
            );
        }
    }

    // First failure decides the exit status.
    results
        .into_iter()
        .find_map(|c| c.startup.err().or_else(|| c.cleanup.err()))
        .map_or(Ok(()), Err)
}

fn outcome(r: &Result<(), LifecycleError>) -> String {
    match r {
        Ok(()) => "ok".into(),
        Err(e) => e.to_string(),
    }
}

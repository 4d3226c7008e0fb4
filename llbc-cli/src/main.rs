//! llbc — inspect and exercise the llbc native libraries.
//!
//! Every native call goes through [`llbc::LifecycleManager`]; this binary never
//! touches the binding shim directly.

#![allow(missing_docs, clippy::print_stderr, clippy::print_stdout)]

mod cmd;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("fatal: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> llbc::Result<()> {
    match &cli.command {
        Command::Identity { json } => cmd::inspect::identity(cli, *json),
        Command::Probe { cycles, json } => cmd::probe::run(cli, *cycles, *json),
        Command::Describe { errno } => cmd::inspect::describe(cli, *errno),
        Command::Config { action } => cmd::config::run(cli, action.as_ref()),
    }
}

/// `RUST_LOG` wins; otherwise `-v` selects info and `-vv` debug.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "llbc=info,warn",
        _ => "llbc=debug,info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! Toolpack - tool package manager
//!
//! Installs tool packages into a local store with all-or-nothing visibility,
//! resolves the commands each package exposes, and restores every tool a
//! project pins in its manifest.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cache;
mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod installer;
mod paths;
mod restore;
mod restorer;
mod store;
mod transaction;

use cli::{Cli, Commands};
use commands::helpers::Context;
use error::Result;

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = || Context::from_args(&cli.global);
    match cli.command {
        Commands::Install(args) => commands::install::run(&ctx()?, args),
        Commands::Uninstall(args) => commands::uninstall::run(&ctx()?, args),
        Commands::List(args) => commands::list::run(&ctx()?, args),
        Commands::Restore(args) => commands::restore::run(&ctx()?, args),
        Commands::Resolve(args) => commands::resolve::run(&ctx()?, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

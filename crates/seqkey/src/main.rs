#![warn(missing_docs)]

//! Entry point for the `seqkey` binary.

mod cli;
mod config;
mod error;
mod session;

use std::process;

use clap::Parser;
use tracing::error;

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    logging::install(&log.spec());

    match command {
        Commands::Check(args) => session::check(&args),
        Commands::Run(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(session::run(&args))
        }
    }
}

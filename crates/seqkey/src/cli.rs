//! Command-line interface definitions for seqkey.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `seqkey` binary.
#[derive(Parser, Debug)]
#[command(name = "seqkey", about = "Key-sequence command dispatcher", version)]
pub struct Cli {
    /// Logging controls shared across seqkey binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a keymap file and report its shape.
    Check(CheckArgs),
    /// Feed key events from stdin through the dispatcher interactively.
    Run(RunArgs),
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to a RON keymap file, e.g. `keymaps/default.ron`.
    #[arg(value_name = "KEYMAP")]
    pub keymap: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to a RON keymap file.
    #[arg(value_name = "KEYMAP")]
    pub keymap: PathBuf,

    /// Disambiguation window for ambiguous chords.
    #[arg(
        long,
        value_parser = humantime::parse_duration,
        default_value = "500ms",
        value_name = "DURATION"
    )]
    pub window: Duration,
}

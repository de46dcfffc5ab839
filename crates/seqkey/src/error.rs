//! Error type for the seqkey binary.

use thiserror::Error;

/// Errors surfaced by CLI subcommands.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem or terminal I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The keymap file failed to parse as RON.
    #[error("keymap parse error: {0}")]
    Keymap(#[from] ron::error::SpannedError),
    /// The binding table was rejected by the engine.
    #[error(transparent)]
    Engine(#[from] seqkey_engine::Error),
}

/// Convenience alias for CLI results.
pub type Result<T> = std::result::Result<T, Error>;

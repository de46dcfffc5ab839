use thiserror::Error;

/// Errors produced while building a dispatcher from a binding table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A chord spec failed to parse.
    #[error(transparent)]
    Spec(#[from] keyspec::SpecError),
    /// Two bindings normalize to the identical token sequence.
    ///
    /// Accepting both would make the winner depend silently on
    /// registration order, so construction fails instead.
    #[error("bindings '{first}' and '{second}' both map the key sequence '{seq}'")]
    DuplicateChord {
        /// Name of the binding registered first.
        first: String,
        /// Name of the binding that collided with it.
        second: String,
        /// The shared token sequence, space-joined.
        seq: String,
    },
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, Error>;

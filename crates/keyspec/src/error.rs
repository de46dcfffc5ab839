use thiserror::Error;

/// Errors produced while parsing a chord specification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The specification contained no tokens at all.
    #[error("empty key specification")]
    Empty,
    /// A modifier prefix was written with no key after it, e.g. `"C-"`.
    #[error("key spec '{spec}' has a modifier prefix but no key")]
    MissingKey {
        /// The offending token spec as written.
        spec: String,
    },
    /// A continuation token carried a modifier prefix, e.g. `"j C-k"`.
    ///
    /// Modifiers are only significant on the first key of a chord, so such
    /// a binding could never be matched.
    #[error("key spec '{spec}' puts a modifier on a continuation key")]
    ModifierOnContinuation {
        /// The offending token spec as written.
        spec: String,
    },
}

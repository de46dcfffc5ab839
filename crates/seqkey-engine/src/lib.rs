//! Seqkey Engine
//!
//! The engine matches a live stream of key events against a table of
//! multi-key chord bindings and decides, per key, whether to fire a
//! command, wait for more input, or abandon the match:
//!
//! - a prefix trie over all registered chords, built once at construction
//! - a bounded ring of the most recent tokens (capacity = longest chord)
//! - a single-slot cancellable timer driving timeout disambiguation
//!
//! The public surface is small: [`Binding`] describes a chord bound to an
//! action, [`Dispatcher`] owns all matching state, and [`Outcome`] tells
//! the caller whether a key was handled (e.g. to suppress the host's
//! default behavior). Actions are opaque callbacks; the engine fires them
//! and never waits on what they do.
//!
//! The disambiguation timer is the only asynchrony, so a tokio runtime
//! must be current when events are dispatched.

mod dispatcher;
mod error;
mod ring;
mod timer;
mod trie;

pub use dispatcher::{ActionFn, Binding, Dispatcher, Outcome};
pub use error::{Error, Result};
pub use keyspec::{KeyEvent, Token};

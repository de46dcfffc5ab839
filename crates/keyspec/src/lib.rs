//! keyspec: key events, tokens, and chord specifications.
//!
//! - [`KeyEvent`]: a raw key press as reported by the host (key identity
//!   plus Ctrl/Shift flags).
//! - [`Token`]: one normalized unit of a key chord, usable as a map key.
//! - Spec helpers: [`parse_seq`] and [`parse_tokens`] turn a compact chord
//!   specification (`"gg"`, `"C-j j"`, `["C-j", "j"]`) into a token
//!   sequence.
//!
//! Normalization and parsing are pure; nothing in this crate touches the
//! host environment.

mod error;
pub use error::SpecError;

mod event;
pub use event::KeyEvent;

mod token;
pub use token::Token;

mod spec;
pub use spec::{parse_seq, parse_tokens};

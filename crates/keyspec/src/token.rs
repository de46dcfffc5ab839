use std::fmt;

use serde::{Deserialize, Serialize};

use crate::KeyEvent;

/// One normalized unit of a key chord.
///
/// A token is a base key plus the Ctrl/Shift markers that qualify it.
/// Canonical textual form: optional `C-` then optional `S-` prefix, in
/// that fixed order, followed by the base key, e.g. `"C-S-j"`.
///
/// Base keys are stored normalized: single printable characters are
/// lowercased, multi-character named keys (`"Escape"`) pass through
/// unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Ctrl marker.
    pub ctrl: bool,
    /// Shift marker.
    pub shift: bool,
    /// Normalized base key.
    pub base: String,
}

impl Token {
    /// A token with no modifier markers. The base is normalized.
    pub fn bare(base: impl AsRef<str>) -> Self {
        Self {
            ctrl: false,
            shift: false,
            base: normalize_base(base.as_ref()),
        }
    }

    /// Normalize a raw key event into a token.
    ///
    /// Returns `None` for bare modifier presses (Shift, Control, Alt,
    /// Meta); those events must not advance any matching state.
    ///
    /// Modifier flags are only encoded when `first` is true, i.e. when
    /// this token would start a new chord. Continuation keys match on the
    /// base alone, regardless of incidental modifier state.
    pub fn from_event(event: &KeyEvent, first: bool) -> Option<Self> {
        if event.is_modifier() {
            return None;
        }
        let base = normalize_base(&event.key);
        if first {
            Some(Self {
                ctrl: event.ctrl,
                shift: event.shift,
                base,
            })
        } else {
            Some(Self {
                ctrl: false,
                shift: false,
                base,
            })
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "C-")?;
        }
        if self.shift {
            write!(f, "S-")?;
        }
        write!(f, "{}", self.base)
    }
}

/// Lowercase single printable characters; pass named keys through.
pub(crate) fn normalize_base(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().collect(),
        _ => key.to_string(),
    }
}

use serde::{Deserialize, Serialize};

/// A raw key press as reported by the host environment.
///
/// `key` is the key identity: a single printable character (`"j"`, `"G"`)
/// or a named key (`"Escape"`, `"ArrowDown"`). The modifier flags reflect
/// what was held when the key went down.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key identity, e.g. `"j"` or `"Escape"`.
    pub key: String,
    /// Whether Ctrl was held.
    pub ctrl: bool,
    /// Whether Shift was held.
    pub shift: bool,
}

impl KeyEvent {
    /// Create an event for `key` with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            shift: false,
        }
    }

    /// Builder-style setter for the Ctrl flag.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Builder-style setter for the Shift flag.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// True if the key identity is itself a bare modifier key.
    ///
    /// Such events carry no chord information of their own and normalize
    /// to no token.
    pub fn is_modifier(&self) -> bool {
        matches!(self.key.as_str(), "Shift" | "Control" | "Alt" | "Meta")
    }
}

//! RON keymap loading.
//!
//! A keymap is an ordered list of `(chord-spec, command-name)` pairs:
//!
//! ```ron
//! [
//!     ("gg", "scroll-top"),
//!     ("C-j j", "split-down"),
//! ]
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parsed keymap: binding entries in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keymap {
    /// `(chord spec, command name)` pairs.
    pub entries: Vec<(String, String)>,
}

impl Keymap {
    /// Parse a keymap from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a keymap file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }
}

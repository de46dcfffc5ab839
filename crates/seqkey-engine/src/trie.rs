//! Prefix trie over registered token sequences.
//!
//! Built once at dispatcher construction; read-only afterwards. Commands
//! are stored as indexes into the dispatcher's binding table so the trie
//! itself stays cheap to share.

use std::collections::HashMap;

use keyspec::Token;

/// Index of a binding in the dispatcher's binding table.
pub(crate) type CmdId = usize;

/// A trie node: children keyed by token, plus an optional terminal.
///
/// `terminal` is set iff some registered chord ends exactly here. A node
/// may carry both a terminal and children when one chord is a strict
/// prefix of another (e.g. `C-j` and `C-j j`).
#[derive(Debug, Default)]
struct Node {
    children: HashMap<Token, Node>,
    terminal: Option<CmdId>,
}

/// Outcome of walking the buffered token sequence through the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    /// Some token had no matching child; the buffered window matches
    /// nothing.
    NoMatch,
    /// The walk ended exactly on a terminal node.
    Exact {
        /// The matched command.
        cmd: CmdId,
        /// Whether the node also has children, i.e. a longer chord could
        /// still be typed.
        extendable: bool,
    },
    /// The walk ended on a non-terminal node with children: a strict
    /// prefix of at least one longer chord.
    Prefix {
        /// Deepest terminal seen on the nodes visited along the way, if
        /// any; the timeout fallback.
        fallback: Option<CmdId>,
    },
}

/// Prefix trie over all registered chords.
#[derive(Debug, Default)]
pub(crate) struct Trie {
    root: Node,
    max_depth: usize,
}

impl Trie {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Longest registered chord, in tokens.
    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Insert a chord for `cmd`. Returns the already-registered command if
    /// the identical sequence is present.
    pub(crate) fn insert(&mut self, tokens: &[Token], cmd: CmdId) -> Result<(), CmdId> {
        let mut node = &mut self.root;
        for tok in tokens {
            node = node.children.entry(tok.clone()).or_default();
        }
        if let Some(existing) = node.terminal {
            return Err(existing);
        }
        node.terminal = Some(cmd);
        self.max_depth = self.max_depth.max(tokens.len());
        Ok(())
    }

    /// Walk the trie across `tokens` in order and classify the result.
    pub(crate) fn walk<'a, I>(&self, tokens: I) -> Walk
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let mut node = &self.root;
        let mut fallback = None;
        for tok in tokens {
            match node.children.get(tok) {
                Some(next) => {
                    node = next;
                    if let Some(cmd) = node.terminal {
                        fallback = Some(cmd);
                    }
                }
                None => return Walk::NoMatch,
            }
        }
        match node.terminal {
            Some(cmd) => Walk::Exact {
                cmd,
                extendable: !node.children.is_empty(),
            },
            None if !node.children.is_empty() => Walk::Prefix { fallback },
            None => Walk::NoMatch,
        }
    }
}

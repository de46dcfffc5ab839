//! Chord specification parsing.
//!
//! A chord spec is the compact form bindings are written in:
//!
//! - a single key: `"i"`, `"Escape"`, `"-"`
//! - a modifier-qualified key, `C` (Ctrl) and/or `S` (Shift) joined with
//!   hyphens: `"C-j"`, `"C-S-j"`
//! - a space-delimited multi-token chord: `"C-j j"`
//! - a bare multi-character string, one token per character: `"gg"`; the
//!   `<space>` placeholder stands for the space key
//!
//! Multi-character specs starting with an ASCII uppercase letter are
//! treated as named keys (`"Escape"`, `"ArrowDown"`), not split apart.

use crate::{SpecError, Token, token::normalize_base};

/// Parse a chord specification string into its token sequence.
pub fn parse_seq(spec: &str) -> Result<Vec<Token>, SpecError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(SpecError::Empty);
    }
    if trimmed.contains(char::is_whitespace) {
        return seq_from_parts(trimmed.split_whitespace());
    }
    if trimmed.contains('-') && trimmed.chars().nth(1).is_some() {
        return Ok(vec![parse_token(trimmed)?]);
    }
    if trimmed.chars().nth(1).is_some() && trimmed.starts_with(|c: char| c.is_ascii_uppercase()) {
        // Named key, e.g. "Escape".
        return Ok(vec![Token::bare(trimmed)]);
    }
    split_bare(trimmed)
}

/// Parse the explicit-array form of a chord spec, one token spec per
/// element: `["C-j", "j"]`.
pub fn parse_tokens<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Token>, SpecError> {
    seq_from_parts(specs.iter().map(AsRef::as_ref))
}

/// Parse token specs in order, rejecting modifiers on continuation keys.
fn seq_from_parts<'a, I>(parts: I) -> Result<Vec<Token>, SpecError>
where
    I: Iterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for part in parts {
        let tok = parse_token(part)?;
        if !out.is_empty() && (tok.ctrl || tok.shift) {
            return Err(SpecError::ModifierOnContinuation {
                spec: part.to_string(),
            });
        }
        out.push(tok);
    }
    if out.is_empty() {
        return Err(SpecError::Empty);
    }
    Ok(out)
}

/// Parse a single token spec: leading `C-`/`S-` segments, then the base.
///
/// Repeated modifier segments collapse, and either order is accepted; the
/// canonical form is always C before S.
fn parse_token(spec: &str) -> Result<Token, SpecError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(SpecError::Empty);
    }
    let mut ctrl = false;
    let mut shift = false;
    let mut rest = trimmed;
    loop {
        if let Some(r) = rest.strip_prefix("C-") {
            ctrl = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("S-") {
            shift = true;
            rest = r;
        } else {
            break;
        }
    }
    if rest.is_empty() {
        return Err(SpecError::MissingKey {
            spec: trimmed.to_string(),
        });
    }
    Ok(Token {
        ctrl,
        shift,
        base: normalize_base(rest),
    })
}

/// Split a bare string into one token per character, honoring `<space>`.
fn split_bare(spec: &str) -> Result<Vec<Token>, SpecError> {
    let mut out = Vec::new();
    let mut rest = spec;
    while let Some(c) = rest.chars().next() {
        if let Some(r) = rest.strip_prefix("<space>") {
            out.push(Token::bare(" "));
            rest = r;
        } else {
            out.push(Token::bare(c.to_string()));
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(out)
}

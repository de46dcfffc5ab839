//! Keymap validation and the interactive stdin-driven session.

use std::time::Duration;

use keyspec::KeyEvent;
use seqkey_engine::{Binding, Dispatcher};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::{
    cli::{CheckArgs, RunArgs},
    config::Keymap,
    error::Result,
};

/// Build a dispatcher whose actions announce the fired command.
fn build_dispatcher(keymap: &Keymap, window: Duration) -> Result<Dispatcher> {
    let mut bindings = Vec::with_capacity(keymap.entries.len());
    for (spec, name) in &keymap.entries {
        let command = name.clone();
        bindings.push(Binding::new(spec, name.clone(), move |event| {
            info!(command = %command, key = %event.key, "command fired");
            println!("-> {command}");
        })?);
    }
    Ok(Dispatcher::with_window(bindings, window)?)
}

/// Parse an input line into a key event.
///
/// Mirrors the chord-spec syntax for a single key: optional `C-`/`S-`
/// prefixes, then the key identity; `<space>` stands for the space key.
/// Blank lines produce no event.
fn event_from_line(line: &str) -> Option<KeyEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
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
        return None;
    }
    let key = if rest == "<space>" { " " } else { rest };
    Some(KeyEvent {
        key: key.to_string(),
        ctrl,
        shift,
    })
}

/// Validate a keymap file: parse it, build the dispatcher, report shape.
pub fn check(args: &CheckArgs) -> Result<()> {
    let keymap = Keymap::load(&args.keymap)?;
    let dispatcher = build_dispatcher(&keymap, Dispatcher::DEFAULT_WINDOW)?;
    println!(
        "ok: {} bindings, longest chord {} tokens",
        dispatcher.len(),
        dispatcher.max_chord_len()
    );
    Ok(())
}

/// Run the interactive session: one key event per stdin line.
pub async fn run(args: &RunArgs) -> Result<()> {
    let keymap = Keymap::load(&args.keymap)?;
    let dispatcher = build_dispatcher(&keymap, args.window)?;
    println!(
        "{} bindings loaded; one key per line (C-/S- prefixes for modifiers), Ctrl-D to quit",
        dispatcher.len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(event) = event_from_line(&line) else {
            continue;
        };
        let outcome = dispatcher.dispatch(&event);
        println!("{}: {}", line.trim(), outcome);
    }

    dispatcher.shutdown();
    Ok(())
}

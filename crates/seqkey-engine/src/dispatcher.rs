//! The per-token dispatch state machine.

use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Duration,
};

use keyspec::{KeyEvent, Token, parse_seq, parse_tokens};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    Error,
    ring::TokenRing,
    timer::TimerSlot,
    trie::{CmdId, Trie, Walk},
};

/// Shared callback invoked when a command fires.
///
/// The dispatcher passes through the raw event that resolved the chord
/// and otherwise knows nothing about what the action does.
pub type ActionFn = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// A chord bound to a named action.
pub struct Binding {
    /// Display name, used in logs and duplicate-chord errors.
    name: String,
    /// Normalized token sequence.
    tokens: Vec<Token>,
    /// Callback to invoke when the chord resolves.
    action: ActionFn,
}

impl Binding {
    /// Bind a chord spec string (see [`keyspec::parse_seq`]) to `action`.
    pub fn new<F>(spec: &str, name: impl Into<String>, action: F) -> Result<Self, Error>
    where
        F: Fn(&KeyEvent) + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            tokens: parse_seq(spec)?,
            action: Arc::new(action),
        })
    }

    /// Bind an explicit token array (`["C-j", "j"]`) to `action`.
    pub fn from_tokens<S, F>(specs: &[S], name: impl Into<String>, action: F) -> Result<Self, Error>
    where
        S: AsRef<str>,
        F: Fn(&KeyEvent) + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            tokens: parse_tokens(specs)?,
            action: Arc::new(action),
        })
    }

    /// The binding's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized chord, space-joined, e.g. `"C-j j"`.
    pub fn seq(&self) -> String {
        join_tokens(&self.tokens)
    }
}

/// What dispatching a single key event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An action fired synchronously for this event.
    Fired,
    /// The buffered sequence matches or extends some chord; a
    /// disambiguation timer is running.
    Pending,
    /// The event was a bare modifier press and consumed no state.
    Ignored,
    /// Nothing matched, even restarting from this key alone.
    Unhandled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fired => "fired",
            Self::Pending => "pending",
            Self::Ignored => "ignored",
            Self::Unhandled => "unhandled",
        };
        write!(f, "{s}")
    }
}

/// Why a disambiguation timer is running.
enum Pending {
    /// No timer outstanding.
    Idle,
    /// Buffer is a strict prefix of longer chords; `fallback` is the
    /// deepest exact match seen along the buffered path, if any.
    Prefix {
        /// Command to fire on expiry, if any.
        fallback: Option<CmdId>,
        /// Event to pass through when the fallback fires.
        event: KeyEvent,
    },
    /// Buffer is an exact match that a longer chord could still extend.
    Exact {
        /// The matched command, fired on expiry or divergence.
        fallback: CmdId,
        /// Event to pass through when the fallback fires.
        event: KeyEvent,
    },
}

/// Mutable matching state, shared with the timer task.
struct MatchState {
    /// Recent tokens, capacity = longest chord.
    ring: TokenRing,
    /// Current wait state.
    pending: Pending,
    /// Bumped on every arm/cancel; fences stale timer callbacks.
    epoch: u64,
    /// Cleared by [`Dispatcher::shutdown`]; nothing fires once false.
    live: bool,
}

/// Name + action for one registered command, indexed by [`CmdId`].
struct Entry {
    name: String,
    action: ActionFn,
}

/// Matches a stream of key events against registered chords and fires the
/// bound actions.
///
/// Construct with [`Dispatcher::new`] and feed events via
/// [`Dispatcher::dispatch`]. The only asynchrony is the disambiguation
/// timer, so a tokio runtime must be current when dispatching. All state
/// is owned by the instance; dropping or [`Dispatcher::shutdown`] ends it.
#[derive(Clone)]
pub struct Dispatcher {
    /// Registered commands, indexed by the trie's [`CmdId`]s.
    entries: Arc<[Entry]>,
    /// Prefix trie over all chords, immutable after construction.
    trie: Arc<Trie>,
    /// Disambiguation window.
    window: Duration,
    /// Ring + pending state, shared with the timer task.
    state: Arc<Mutex<MatchState>>,
    /// Single-slot disambiguation timer.
    timer: Arc<TimerSlot>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("entries", &self.entries.len())
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Default disambiguation window: long enough to finish a chord by
    /// hand, short enough not to delay single-key commands noticeably.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

    /// Build a dispatcher over `bindings` with the default window.
    pub fn new(bindings: Vec<Binding>) -> Result<Self, Error> {
        Self::with_window(bindings, Self::DEFAULT_WINDOW)
    }

    /// Build a dispatcher with an explicit disambiguation window.
    ///
    /// The trie is built in one pass; two bindings normalizing to the
    /// identical token sequence are rejected here rather than letting
    /// registration order decide silently.
    pub fn with_window(bindings: Vec<Binding>, window: Duration) -> Result<Self, Error> {
        let mut trie = Trie::new();
        let mut entries: Vec<Entry> = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let id = entries.len();
            if let Err(existing) = trie.insert(&binding.tokens, id) {
                return Err(Error::DuplicateChord {
                    first: entries[existing].name.clone(),
                    seq: join_tokens(&binding.tokens),
                    second: binding.name,
                });
            }
            entries.push(Entry {
                name: binding.name,
                action: binding.action,
            });
        }
        let cap = trie.max_depth().max(1);
        debug!(
            bindings = entries.len(),
            max_chord = cap,
            window_ms = window.as_millis() as u64,
            "dispatcher built"
        );
        Ok(Self {
            entries: entries.into(),
            trie: Arc::new(trie),
            window,
            state: Arc::new(Mutex::new(MatchState {
                ring: TokenRing::new(cap),
                pending: Pending::Idle,
                epoch: 0,
                live: true,
            })),
            timer: Arc::new(TimerSlot::new()),
        })
    }

    /// The configured disambiguation window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest registered chord, in tokens.
    pub fn max_chord_len(&self) -> usize {
        self.trie.max_depth()
    }

    /// Feed one raw key event through the matcher.
    ///
    /// Matching state is fully updated before any action callback runs,
    /// so actions may feed events back into the dispatcher without
    /// corrupting it.
    pub fn dispatch(&self, event: &KeyEvent) -> Outcome {
        let mut fired: Vec<(CmdId, KeyEvent)> = Vec::new();
        let outcome = {
            let mut st = self.state.lock();
            if !st.live {
                return Outcome::Unhandled;
            }
            let first = st.ring.is_empty();
            let Some(token) = Token::from_event(event, first) else {
                trace!(key = %event.key, "modifier-only key ignored");
                return Outcome::Ignored;
            };
            trace!(token = %token, first, "token received");
            st.ring.push(token);

            let mut walk = self.trie.walk(st.ring.iter());
            if walk == Walk::NoMatch {
                // Divergence. A pending exact match has just been ruled
                // out of extending; fire it now, then restart matching
                // from the newest token alone.
                if let Pending::Exact {
                    fallback,
                    event: armed,
                } = std::mem::replace(&mut st.pending, Pending::Idle)
                {
                    debug!(command = %self.entries[fallback].name, "divergence flushes pending match");
                    fired.push((fallback, armed));
                }
                self.invalidate(&mut st);
                st.ring.keep_newest();
                walk = self.trie.walk(st.ring.iter());
            }

            match walk {
                Walk::NoMatch => {
                    st.ring.clear();
                    trace!("no chord starts with this key");
                    Outcome::Unhandled
                }
                Walk::Exact {
                    cmd,
                    extendable: false,
                } => {
                    self.invalidate(&mut st);
                    st.ring.clear();
                    fired.push((cmd, event.clone()));
                    Outcome::Fired
                }
                Walk::Exact {
                    cmd,
                    extendable: true,
                } => {
                    self.arm(
                        &mut st,
                        Pending::Exact {
                            fallback: cmd,
                            event: event.clone(),
                        },
                    );
                    Outcome::Pending
                }
                Walk::Prefix { fallback } => {
                    self.arm(
                        &mut st,
                        Pending::Prefix {
                            fallback,
                            event: event.clone(),
                        },
                    );
                    Outcome::Pending
                }
            }
        };
        for (cmd, ev) in fired {
            run_entry(&self.entries, cmd, &ev);
        }
        outcome
    }

    /// Tear the dispatcher down: cancel any armed timer and drop all
    /// buffered state. No action fires after this returns.
    pub fn shutdown(&self) {
        let mut st = self.state.lock();
        st.live = false;
        st.epoch = st.epoch.wrapping_add(1);
        st.pending = Pending::Idle;
        st.ring.clear();
        self.timer.cancel();
        debug!("dispatcher shut down");
    }

    /// Cancel the pending timer and fence out its callback.
    fn invalidate(&self, st: &mut MatchState) {
        st.epoch = st.epoch.wrapping_add(1);
        st.pending = Pending::Idle;
        self.timer.cancel();
    }

    /// Record `pending` and (re)arm the disambiguation timer for it.
    fn arm(&self, st: &mut MatchState, pending: Pending) {
        st.epoch = st.epoch.wrapping_add(1);
        let epoch = st.epoch;
        st.pending = pending;
        let state = Arc::clone(&self.state);
        let entries = Arc::clone(&self.entries);
        self.timer.arm(self.window, move || {
            // Resolve under the lock, fire after releasing it.
            let pending = {
                let mut st = state.lock();
                if !st.live || st.epoch != epoch {
                    return;
                }
                st.ring.clear();
                std::mem::replace(&mut st.pending, Pending::Idle)
            };
            match pending {
                Pending::Exact { fallback, event } => run_entry(&entries, fallback, &event),
                Pending::Prefix {
                    fallback: Some(cmd),
                    event,
                } => run_entry(&entries, cmd, &event),
                Pending::Prefix { fallback: None, .. } => {
                    trace!("disambiguation window expired with no fallback");
                }
                Pending::Idle => {}
            }
        });
    }
}

/// Invoke a command's action, isolating panics so one misbehaving action
/// cannot break matching for subsequent keys.
fn run_entry(entries: &[Entry], cmd: CmdId, event: &KeyEvent) {
    let entry = &entries[cmd];
    debug!(command = %entry.name, key = %event.key, "firing command");
    if catch_unwind(AssertUnwindSafe(|| (entry.action)(event))).is_err() {
        warn!(command = %entry.name, "command action panicked");
    }
}

/// Space-joined canonical form of a token sequence.
fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

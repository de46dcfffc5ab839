use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use keyspec::KeyEvent;
use seqkey_engine::{Binding, Dispatcher, Outcome};

fn ev(key: &str) -> KeyEvent {
    KeyEvent::new(key)
}

/// Binding whose action bumps a shared counter.
fn counted(spec: &str, name: &str, count: &Arc<AtomicUsize>) -> Binding {
    let count = Arc::clone(count);
    Binding::new(spec, name, move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    })
    .expect("binding")
}

/// Sleep past the disambiguation window (auto-advanced under paused time).
async fn expire() {
    tokio::time::sleep(Dispatcher::DEFAULT_WINDOW + Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn single_key_fires_immediately() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![counted("j", "down", &hits)]).expect("build");

    assert_eq!(d.dispatch(&ev("j")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // No timer was created: nothing else fires later.
    expire().await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Buffer was cleared; the next press fires again.
    assert_eq!(d.dispatch(&ev("j")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn ambiguous_prefix_expires_silently() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![counted("gg", "top", &hits)]).expect("build");

    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    expire().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // The window cleared the buffer: a fresh "g g" still completes.
    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn prefix_completes_within_window() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![counted("gg", "top", &hits)]).expect("build");

    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The cancelled timer must not fire a second time.
    expire().await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn longer_chord_preferred_over_exact() {
    let short = Arc::new(AtomicUsize::new(0));
    let long = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![
        counted("C-j", "short", &short),
        Binding::from_tokens(&["C-j", "j"], "long", {
            let long = Arc::clone(&long);
            move |_| {
                long.fetch_add(1, Ordering::SeqCst);
            }
        })
        .expect("binding"),
    ])
    .expect("build");

    assert_eq!(d.dispatch(&ev("j").with_ctrl()), Outcome::Pending);
    assert_eq!(short.load(Ordering::SeqCst), 0);

    assert_eq!(d.dispatch(&ev("j")), Outcome::Fired);
    assert_eq!(long.load(Ordering::SeqCst), 1);
    expire().await;
    assert_eq!(short.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn exact_with_continuation_times_out_once() {
    let short = Arc::new(AtomicUsize::new(0));
    let long = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![
        counted("C-j", "short", &short),
        counted("C-j j", "long", &long),
    ])
    .expect("build");

    assert_eq!(d.dispatch(&ev("j").with_ctrl()), Outcome::Pending);
    expire().await;
    assert_eq!(short.load(Ordering::SeqCst), 1);
    assert_eq!(long.load(Ordering::SeqCst), 0);

    // Long after expiry nothing else fires.
    expire().await;
    assert_eq!(short.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn divergence_retries_from_latest_token() {
    let top = Arc::new(AtomicUsize::new(0));
    let up = Arc::new(AtomicUsize::new(0));
    let d =
        Dispatcher::new(vec![counted("gg", "top", &top), counted("k", "up", &up)]).expect("build");

    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    // "g k" matches nothing, but "k" alone must be evaluated fresh.
    assert_eq!(d.dispatch(&ev("k")), Outcome::Fired);
    assert_eq!(up.load(Ordering::SeqCst), 1);
    assert_eq!(top.load(Ordering::SeqCst), 0);

    expire().await;
    assert_eq!(top.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn divergence_flushes_pending_exact() {
    let short = Arc::new(AtomicUsize::new(0));
    let long = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![
        counted("C-j", "short", &short),
        counted("C-j j", "long", &long),
    ])
    .expect("build");

    assert_eq!(d.dispatch(&ev("j").with_ctrl()), Outcome::Pending);
    // "z" rules out the longer chord: the pending exact fires now.
    assert_eq!(d.dispatch(&ev("z")), Outcome::Unhandled);
    assert_eq!(short.load(Ordering::SeqCst), 1);
    assert_eq!(long.load(Ordering::SeqCst), 0);

    expire().await;
    assert_eq!(short.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn prefix_timeout_falls_back_to_deepest_exact() {
    let a = Arc::new(AtomicUsize::new(0));
    let abc = Arc::new(AtomicUsize::new(0));
    let d =
        Dispatcher::new(vec![counted("a", "a", &a), counted("abc", "abc", &abc)]).expect("build");

    assert_eq!(d.dispatch(&ev("a")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("b")), Outcome::Pending);
    expire().await;

    // Rearming replaced the first timer; "a" fires exactly once.
    assert_eq!(a.load(Ordering::SeqCst), 1);
    assert_eq!(abc.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn ring_stays_bounded() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![counted("gg", "top", &hits)]).expect("build");

    // Far more unrelated tokens than the chord length never grow state or
    // change the outcome for the suffix.
    for key in ["x", "y", "z", "q", "x", "y", "z", "q"] {
        assert_eq!(d.dispatch(&ev(key)), Outcome::Unhandled);
    }
    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn continuation_modifiers_ignored() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![Binding::from_tokens(&["C-j", "j"], "split", {
        let hits = Arc::clone(&hits);
        move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    })
    .expect("binding")])
    .expect("build");

    assert_eq!(d.dispatch(&ev("j").with_ctrl()), Outcome::Pending);
    // Shift held on the continuation key must not break the match.
    assert_eq!(d.dispatch(&ev("j").with_shift()), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn modifier_events_do_not_advance() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![counted("gg", "top", &hits)]).expect("build");

    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("Shift")), Outcome::Ignored);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rapid_input_arms_at_most_one_timer() {
    let single = Arc::new(AtomicUsize::new(0));
    let double = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![
        counted("g", "single", &single),
        counted("gg", "double", &double),
    ])
    .expect("build");

    // Each press would individually arm a timer; pairs resolve to "gg"
    // and no stale timer may fire "g" afterwards.
    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Fired);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    assert_eq!(d.dispatch(&ev("g")), Outcome::Fired);
    expire().await;
    assert_eq!(double.load(Ordering::SeqCst), 2);
    assert_eq!(single.load(Ordering::SeqCst), 0);

    // A lone trailing press falls back to "g" exactly once.
    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    expire().await;
    assert_eq!(single.load(Ordering::SeqCst), 1);
    assert_eq!(double.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn first_token_modifiers_are_significant() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![counted("C-j", "split", &hits)]).expect("build");

    assert_eq!(d.dispatch(&ev("j")), Outcome::Unhandled);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(d.dispatch(&ev("j").with_ctrl()), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn teardown_is_terminal() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![
        counted("g", "single", &hits),
        counted("gg", "double", &hits),
    ])
    .expect("build");

    // A timer is in flight when teardown happens.
    assert_eq!(d.dispatch(&ev("g")), Outcome::Pending);
    d.shutdown();
    expire().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // The dispatcher stays dead.
    assert_eq!(d.dispatch(&ev("g")), Outcome::Unhandled);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn panicking_action_does_not_break_matching() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new(vec![
        Binding::new("p", "bad", |_| panic!("action failure")).expect("binding"),
        counted("j", "down", &hits),
    ])
    .expect("build");

    assert_eq!(d.dispatch(&ev("p")), Outcome::Fired);
    assert_eq!(d.dispatch(&ev("j")), Outcome::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn action_receives_triggering_event() {
    let seen: Arc<std::sync::Mutex<Option<KeyEvent>>> = Arc::new(std::sync::Mutex::new(None));
    let d = Dispatcher::new(vec![Binding::new("C-j", "split", {
        let seen = Arc::clone(&seen);
        move |event| {
            *seen.lock().expect("lock") = Some(event.clone());
        }
    })
    .expect("binding")])
    .expect("build");

    let press = ev("j").with_ctrl();
    assert_eq!(d.dispatch(&press), Outcome::Fired);
    assert_eq!(seen.lock().expect("lock").as_ref(), Some(&press));
}

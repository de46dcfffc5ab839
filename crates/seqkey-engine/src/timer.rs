//! Single-slot cancellable one-shot timer.
//!
//! Arming always cancels whatever was pending first, so at most one timer
//! is outstanding at any time. Cancellation is cooperative via a
//! [`CancellationToken`]; a callback that loses the race against
//! cancellation is still fenced out by the dispatcher's epoch check.

use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// One-shot timer slot: "cancel previous, schedule new".
#[derive(Debug, Default)]
pub(crate) struct TimerSlot {
    current: Mutex<Option<CancellationToken>>,
}

impl TimerSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Schedule `run` after `delay`, cancelling any previously armed timer.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn arm<F>(&self, delay: Duration, run: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancel = token.clone();
        if let Some(prev) = self.current.lock().replace(token) {
            prev.cancel();
        }
        trace!(delay_ms = delay.as_millis() as u64, "timer armed");
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    trace!("timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    run();
                }
            }
        });
    }

    /// Cancel the pending timer, if any.
    pub(crate) fn cancel(&self) {
        if let Some(prev) = self.current.lock().take() {
            prev.cancel();
        }
    }
}

//! Trailing-edge debounce for query edits
//!
//! Every [`Debouncer::schedule`] call restarts the quiet-period timer. Only
//! the last value of a burst is delivered, once the timer runs out without
//! another call. Nothing is delivered on the leading edge.
//!
//! Timers run as tokio tasks. Each carries the sequence number it was
//! scheduled with; a firing whose number is no longer current (because a later
//! call superseded it after it had already fired) is discarded on receipt, so
//! a burst yields exactly one settled value.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Quiet period used when none is configured
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

struct Fired<T> {
    token: u64,
    value: T,
}

/// Coalesces rapid updates into a single settled value
pub struct Debouncer<T> {
    quiet: Duration,
    seq: u64,
    pending: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<Fired<T>>,
    rx: mpsc::UnboundedReceiver<Fired<T>>,
    closed: bool,
}

impl<T: Send + 'static> Debouncer<T> {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            quiet,
            seq: 0,
            pending: None,
            tx,
            rx,
            closed: false,
        }
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record `value` as pending and restart the quiet-period timer
    ///
    /// Must be called from within a tokio runtime. Ignored after
    /// [`shutdown`](Self::shutdown).
    pub fn schedule(&mut self, value: T) {
        if self.closed {
            return;
        }
        self.cancel();

        self.seq = self.seq.wrapping_add(1);
        let token = self.seq;
        let cancel = CancellationToken::new();
        self.pending = Some(cancel.clone());

        let tx = self.tx.clone();
        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = sleep(quiet) => {
                    let _ = tx.send(Fired { token, value });
                }
            }
        });
    }

    /// Whether a value is waiting for its quiet period to end
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending value to settle
    ///
    /// Returns `None` immediately when nothing is pending. Cancel-safe, so it
    /// can be raced in `tokio::select!`.
    pub async fn settled(&mut self) -> Option<T> {
        while self.pending.is_some() {
            let fired = self.rx.recv().await?;
            if fired.token == self.seq {
                self.pending = None;
                return Some(fired.value);
            }
            trace!(token = fired.token, current = self.seq, "dropping superseded debounce timer");
        }
        None
    }

    /// Drop the pending value without emitting it
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// Cancel any pending value and refuse further scheduling
    pub fn shutdown(&mut self) {
        self.cancel();
        self.closed = true;
        self.rx.close();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

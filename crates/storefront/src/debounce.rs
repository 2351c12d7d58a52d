//! Debounce timer for live search.
//!
//! Typing produces a burst of query changes; only the last one should reach
//! the backend. [`SearchDebouncer::schedule`] restarts the timer on every
//! change and the settled query comes out of the receiver returned by
//! [`SearchDebouncer::new`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Cancellable single-slot timer owned by whoever drives the UI.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct SearchDebouncer {
    window: Duration,
    sender: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Create a debouncer and the receiver its settled queries arrive on.
    #[must_use]
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            window,
            sender,
            pending: None,
        };
        (debouncer, receiver)
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Start the timer for `query`, cancelling any earlier pending query.
    pub fn schedule(&mut self, query: impl Into<String>) {
        self.cancel_pending();

        let query = query.into();
        let sender = self.sender.clone();
        let window = self.window;
        trace!(%query, "Search scheduled");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Receiver gone means the session ended; nothing to deliver to.
            let _ = sender.send(query);
        }));
    }

    /// Cancel the pending query, if any. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a query is still waiting for its window to pass.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_only_last_query_is_delivered() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(WINDOW);

        debouncer.schedule("m");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule("ma");
        tokio::time::sleep(Duration::from_millis(299)).await;
        debouncer.schedule("math");

        assert_eq!(rx.recv().await.as_deref(), Some("math"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_waits_for_full_window() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(WINDOW);

        debouncer.schedule("art");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(rx.try_recv().is_err());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rx.try_recv().ok().as_deref(), Some("art"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(WINDOW);

        debouncer.schedule("music");
        assert!(debouncer.cancel_pending());
        assert!(!debouncer.cancel_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(WINDOW);
        debouncer.schedule("drama");
        drop(debouncer);

        // Sender dropped with the debouncer and the timer never fired
        assert!(rx.recv().await.is_none());
    }
}

//! Watch-channel cancellation.
//!
//! A [`CancellationSource`] is owned by whoever decides that a poll is no
//! longer wanted (typically the presentation host). Every token handed out
//! observes the same flag. Dropping the source cancels its tokens, so a
//! torn-down owner never leaves a poll running on its behalf.

use async_trait::async_trait;
use std::sync::Arc;
use stratus_core::CancellationToken;
use tokio::sync::watch;
use tracing::debug;

/// Owner side of a cancellation flag.
#[derive(Debug)]
pub struct CancellationSource {
    cancel_tx: watch::Sender<bool>,
}

impl CancellationSource {
    /// Create an uncancelled source.
    pub fn new() -> Self {
        let (cancel_tx, _cancel_rx) = watch::channel(false);
        Self { cancel_tx }
    }

    /// A token observing this source.
    pub fn token(&self) -> WatchCancellationToken {
        WatchCancellationToken {
            cancel_rx: self.cancel_tx.subscribe(),
        }
    }

    /// A token observing this source, boxed for `dyn` use.
    pub fn shared_token(&self) -> Arc<dyn CancellationToken> {
        Arc::new(self.token())
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let was_cancelled = self.cancel_tx.send_replace(true);
        if !was_cancelled {
            debug!(observers = self.cancel_tx.receiver_count(), "Cancellation requested");
        }
    }

    /// True once [`CancellationSource::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancellationSource {
    fn drop(&mut self) {
        self.cancel_tx.send_replace(true);
    }
}

/// Observer side of a [`CancellationSource`].
#[derive(Debug, Clone)]
pub struct WatchCancellationToken {
    cancel_rx: watch::Receiver<bool>,
}

#[async_trait]
impl CancellationToken for WatchCancellationToken {
    async fn cancelled(&self) {
        let mut cancel_rx = self.cancel_rx.clone();
        loop {
            if *cancel_rx.borrow_and_update() {
                return;
            }
            if cancel_rx.changed().await.is_err() {
                // Sender gone; its Drop already published `true`.
                return;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    #[test]
    fn test_new_source_is_not_cancelled() {
        let source = CancellationSource::new();
        let token = source.token();
        assert!(!source.is_cancelled());
        assert!(!token.is_cancelled());
        assert!(token.cancelled().now_or_never().is_none());
    }

    #[test]
    fn test_cancel_is_observed_by_all_tokens() {
        let source = CancellationSource::new();
        let first = source.token();
        let second = source.shared_token();
        source.cancel();
        source.cancel();
        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
        assert!(first.cancelled().now_or_never().is_some());
    }

    #[test]
    fn test_token_created_after_cancel_sees_it() {
        let source = CancellationSource::new();
        source.cancel();
        assert!(source.token().is_cancelled());
    }

    #[test]
    fn test_drop_cancels() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);
        assert!(token.is_cancelled());
        assert!(token.cancelled().now_or_never().is_some());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });
        tokio::task::yield_now().await;
        source.cancel();
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter task should not panic");
    }
}

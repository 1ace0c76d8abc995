//! Convergence polling.
//!
//! A poll fetches once immediately, then keeps fetching with backoff
//! between attempts until one of four outcomes:
//!
//! - the observed state equals the expected state (`Converged`)
//! - the backoff saturates its cap, or an opt-in attempt budget runs out (`GaveUp`)
//! - the caller cancels (`Cancelled`)
//! - a fetch returns an error (`Failed`, never retried)
//!
//! Fetches are strictly sequential. Cancellation is checked before every
//! fetch, after every fetch and throughout each wait; a fetch already in
//! flight runs to completion and its result is discarded.

use crate::backoff::{BackoffConfig, BackoffScheduler};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use stratus_core::{CancellationToken, NeverCancel, PollOutcome, RandomEffects, TimeEffects};
use tracing::{debug, info, warn};

/// One "wait until remote state X" operation.
pub struct PollRequest<F, S> {
    fetch: F,
    expected: S,
    backoff: Option<BackoffConfig>,
    cancellation: Arc<dyn CancellationToken>,
    label: String,
}

impl<F, S> PollRequest<F, S> {
    /// Poll `fetch` until it yields `expected`.
    pub fn new(fetch: F, expected: S) -> Self {
        Self {
            fetch,
            expected,
            backoff: None,
            cancellation: Arc::new(NeverCancel),
            label: String::from("poll"),
        }
    }

    /// Override the poller's default backoff.
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Stop early when `token` fires.
    pub fn with_cancellation(mut self, token: Arc<dyn CancellationToken>) -> Self {
        self.cancellation = token;
        self
    }

    /// Name used in log records.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl<F, S: fmt::Debug> fmt::Debug for PollRequest<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollRequest")
            .field("expected", &self.expected)
            .field("backoff", &self.backoff)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Outcome of a poll together with what it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport<S, E> {
    /// How the poll ended
    pub outcome: PollOutcome<S, E>,
    /// Number of fetches issued
    pub fetches: u32,
    /// Number of backoff waits completed
    pub delays: u32,
    /// Sum of completed backoff waits
    pub total_delay: Duration,
    /// Last successfully fetched state, kept even when it was discarded
    /// by a cancellation
    pub last_observed: Option<S>,
    /// Elapsed milliseconds on the poller's clock
    pub elapsed_ms: u64,
}

impl<S, E> PollReport<S, E> {
    /// True if the expected state was observed.
    pub fn is_converged(&self) -> bool {
        self.outcome.is_converged()
    }

    /// True if any backoff wait completed.
    pub fn had_retries(&self) -> bool {
        self.delays > 0
    }

    /// Drop the statistics.
    pub fn into_outcome(self) -> PollOutcome<S, E> {
        self.outcome
    }
}

struct Tally<S> {
    fetches: u32,
    delays: u32,
    total_delay: Duration,
    last_observed: Option<S>,
    started_ms: u64,
}

impl<S> Tally<S> {
    fn finish<E>(self, outcome: PollOutcome<S, E>, now_ms: u64) -> PollReport<S, E> {
        PollReport {
            outcome,
            fetches: self.fetches,
            delays: self.delays,
            total_delay: self.total_delay,
            last_observed: self.last_observed,
            elapsed_ms: now_ms.saturating_sub(self.started_ms),
        }
    }
}

/// Drives [`PollRequest`]s against injected time and randomness.
#[derive(Clone)]
pub struct ConvergencePoller {
    time: Arc<dyn TimeEffects>,
    random: Arc<dyn RandomEffects>,
    default_backoff: BackoffConfig,
}

impl ConvergencePoller {
    /// Poller using [`BackoffConfig::default`] for requests without their own.
    pub fn new(time: Arc<dyn TimeEffects>, random: Arc<dyn RandomEffects>) -> Self {
        Self {
            time,
            random,
            default_backoff: BackoffConfig::default(),
        }
    }

    /// Replace the fallback backoff.
    pub fn with_default_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.default_backoff = backoff;
        self
    }

    /// The fallback backoff.
    pub fn default_backoff(&self) -> &BackoffConfig {
        &self.default_backoff
    }

    /// Run `request` to one of its four outcomes.
    pub async fn poll<F, Fut, S, E>(&self, request: PollRequest<F, S>) -> PollReport<S, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<S, E>>,
        S: PartialEq + Clone + fmt::Debug,
        E: fmt::Display,
    {
        let PollRequest {
            mut fetch,
            expected,
            backoff,
            cancellation,
            label,
        } = request;

        let config = backoff.unwrap_or_else(|| self.default_backoff.clone());
        let max_attempts = config.max_attempts.map(|limit| limit.max(1));
        let mut scheduler = BackoffScheduler::new(config, self.random.clone());
        let mut tally = Tally {
            fetches: 0,
            delays: 0,
            total_delay: Duration::ZERO,
            last_observed: None,
            started_ms: self.time.now_ms(),
        };

        loop {
            if cancellation.is_cancelled() {
                debug!(
                    label = %label,
                    fetches = tally.fetches,
                    "Poll cancelled before fetch"
                );
                return tally.finish(PollOutcome::Cancelled, self.time.now_ms());
            }

            let fetched = fetch().await;
            tally.fetches += 1;

            if cancellation.is_cancelled() {
                if let Ok(observed) = fetched {
                    tally.last_observed = Some(observed);
                }
                debug!(
                    label = %label,
                    fetches = tally.fetches,
                    "Poll cancelled during fetch; discarding result"
                );
                return tally.finish(PollOutcome::Cancelled, self.time.now_ms());
            }

            let observed = match fetched {
                Ok(observed) => observed,
                Err(error) => {
                    warn!(
                        label = %label,
                        fetches = tally.fetches,
                        error = %error,
                        "Fetch failed; not retrying"
                    );
                    return tally.finish(PollOutcome::Failed(error), self.time.now_ms());
                }
            };

            if observed == expected {
                info!(
                    label = %label,
                    fetches = tally.fetches,
                    total_delay_ms = tally.total_delay.as_millis() as u64,
                    state = ?observed,
                    "Converged"
                );
                tally.last_observed = Some(observed.clone());
                return tally.finish(PollOutcome::Converged(observed), self.time.now_ms());
            }

            debug!(
                label = %label,
                attempt = scheduler.state().attempt_index(),
                observed = ?observed,
                expected = ?expected,
                "State not yet converged"
            );
            tally.last_observed = Some(observed);

            if max_attempts.is_some_and(|limit| tally.fetches >= limit) {
                warn!(
                    label = %label,
                    fetches = tally.fetches,
                    "Giving up: attempt budget exhausted"
                );
                return tally.finish(PollOutcome::GaveUp, self.time.now_ms());
            }

            let delay = scheduler.next_delay();
            if scheduler.is_saturated(delay) {
                warn!(
                    label = %label,
                    fetches = tally.fetches,
                    cap_ms = scheduler.config().cap.as_millis() as u64,
                    "Giving up: backoff reached its cap"
                );
                return tally.finish(PollOutcome::GaveUp, self.time.now_ms());
            }

            let cancelled = tokio::select! {
                biased;
                _ = cancellation.cancelled() => true,
                _ = self.time.sleep(delay) => false,
            };
            if cancelled {
                debug!(
                    label = %label,
                    fetches = tally.fetches,
                    "Poll cancelled while waiting"
                );
                return tally.finish(PollOutcome::Cancelled, self.time.now_ms());
            }

            tally.delays += 1;
            tally.total_delay += delay;
            scheduler.advance();
        }
    }
}

impl fmt::Debug for ConvergencePoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvergencePoller")
            .field("default_backoff", &self.default_backoff)
            .finish_non_exhaustive()
    }
}

//! Virtual clock for deterministic poll tests.
//!
//! Sleeps return immediately after advancing the clock and recording the
//! requested duration. A handler can be armed to cancel a
//! [`CancellationSource`] on its n-th sleep. Parking forever afterwards
//! models a cancellation arriving while a backoff wait is in flight;
//! completing the sleep models one that lands just as the wait ends.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use stratus_core::TimeEffects;
use stratus_effects::CancellationSource;

#[derive(Debug)]
struct SleepTrigger {
    nth: usize,
    source: Arc<CancellationSource>,
    park: bool,
}

#[derive(Debug, Default)]
struct ClockState {
    now_ms: u64,
    sleeps: Vec<Duration>,
    trigger: Option<SleepTrigger>,
}

/// Mock time handler with a manually advanced clock.
#[derive(Debug, Clone, Default)]
pub struct MockTimeHandler {
    state: Arc<Mutex<ClockState>>,
}

impl MockTimeHandler {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `now_ms`.
    pub fn starting_at(now_ms: u64) -> Self {
        let handler = Self::new();
        handler.state.lock().now_ms = now_ms;
        handler
    }

    /// Cancel `source` when the `nth` sleep (1-based) begins, then never wake.
    pub fn cancel_on_sleep(self, nth: usize, source: Arc<CancellationSource>) -> Self {
        self.arm(nth, source, true)
    }

    /// Cancel `source` during the `nth` sleep (1-based) but let that sleep
    /// complete normally.
    pub fn cancel_after_sleep(self, nth: usize, source: Arc<CancellationSource>) -> Self {
        self.arm(nth, source, false)
    }

    fn arm(self, nth: usize, source: Arc<CancellationSource>, park: bool) -> Self {
        self.state.lock().trigger = Some(SleepTrigger { nth, source, park });
        self
    }

    /// Advance the clock without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now_ms = state.now_ms.saturating_add(duration_ms(duration));
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().sleeps.clone()
    }

    /// Sum of all requested sleeps.
    pub fn total_slept(&self) -> Duration {
        self.state.lock().sleeps.iter().sum()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl TimeEffects for MockTimeHandler {
    async fn sleep(&self, duration: Duration) {
        let fired = {
            let mut state = self.state.lock();
            state.sleeps.push(duration);
            let count = state.sleeps.len();
            let fired = if state.trigger.as_ref().is_some_and(|t| t.nth == count) {
                state.trigger.take()
            } else {
                None
            };
            if !fired.as_ref().is_some_and(|trigger| trigger.park) {
                state.now_ms = state.now_ms.saturating_add(duration_ms(duration));
            }
            fired
        };

        if let Some(trigger) = fired {
            trigger.source.cancel();
            if trigger.park {
                futures::future::pending::<()>().await;
            }
        }
    }

    fn now_ms(&self) -> u64 {
        self.state.lock().now_ms
    }
}

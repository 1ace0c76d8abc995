//! Randomized binary-exponential backoff.
//!
//! The delay before retry `n` (zero-based) is drawn uniformly from
//! `[0, base * 2^min(n, max_exponent))` and then clamped to `cap`. The only
//! impure input is the uniform draw, which comes from [`RandomEffects`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use stratus_core::{RandomEffects, StratusError, StratusResult};

/// Largest exponent ever applied, whatever `max_exponent` says.
pub const EXPONENT_LIMIT: u32 = 62;

/// Backoff tuning for one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Scale of the first retry delay
    pub base: Duration,
    /// Hard ceiling; a delay reaching it ends the poll
    pub cap: Duration,
    /// Upper bound on the jitter draw's exponent
    pub max_exponent: u32,
    /// Optional ceiling on fetches per poll, the first one included.
    /// Without one, only the cap ends a poll that never converges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

impl BackoffConfig {
    /// Config with the given base and cap and default bounds.
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self {
            base,
            cap,
            ..Self::default()
        }
    }

    /// Set the jitter bound.
    pub fn with_max_exponent(mut self, max_exponent: u32) -> Self {
        self.max_exponent = max_exponent;
        self
    }

    /// Set the fetch ceiling.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Reject configurations that cannot pace a poll.
    pub fn validate(&self) -> StratusResult<()> {
        if self.base.is_zero() {
            return Err(StratusError::validation("backoff base must be positive"));
        }
        if self.cap < self.base {
            return Err(StratusError::validation(format!(
                "backoff cap {:?} is below base {:?}",
                self.cap, self.base
            )));
        }
        if self.max_attempts == Some(0) {
            return Err(StratusError::validation(
                "backoff max_attempts must be at least 1",
            ));
        }
        Ok(())
    }

    fn exponent(&self, attempt_index: u32) -> i32 {
        // Bounded by EXPONENT_LIMIT, so the cast is lossless.
        attempt_index.min(self.max_exponent).min(EXPONENT_LIMIT) as i32
    }

    /// Delay before retry `attempt_index`, drawn from `random`.
    ///
    /// Always `<= cap`.
    pub fn next_delay(&self, attempt_index: u32, random: &dyn RandomEffects) -> Duration {
        let draw = random.random_unit();
        let draw = if draw.is_finite() { draw.clamp(0.0, 1.0) } else { 0.0 };

        let raw_nanos = self.base.as_nanos() as f64 * draw * 2f64.powi(self.exponent(attempt_index));
        let cap_nanos = self.cap.as_nanos() as f64;
        if raw_nanos >= cap_nanos || raw_nanos >= u64::MAX as f64 {
            return self.cap;
        }
        Duration::from_nanos(raw_nanos as u64)
    }

    /// Largest delay [`BackoffConfig::next_delay`] could draw for
    /// `attempt_index` before the cap is applied. Non-decreasing in
    /// `attempt_index`.
    pub fn max_raw_delay(&self, attempt_index: u32) -> Duration {
        let bound = self.base.as_secs_f64() * 2f64.powi(self.exponent(attempt_index));
        Duration::try_from_secs_f64(bound).unwrap_or(Duration::MAX)
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(20),
            max_exponent: EXPONENT_LIMIT,
            max_attempts: None,
        }
    }
}

/// Retry counter for a single poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackoffState {
    attempt_index: u32,
}

impl BackoffState {
    /// Fresh state; the next delay is the first retry's.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based index of the next retry.
    pub fn attempt_index(&self) -> u32 {
        self.attempt_index
    }

    /// Record that a retry delay was served.
    pub fn advance(&mut self) {
        self.attempt_index = self.attempt_index.saturating_add(1);
    }
}

/// A [`BackoffConfig`] bound to a random source and its own [`BackoffState`].
pub struct BackoffScheduler {
    config: BackoffConfig,
    random: Arc<dyn RandomEffects>,
    state: BackoffState,
}

impl BackoffScheduler {
    /// Scheduler starting at retry zero.
    pub fn new(config: BackoffConfig, random: Arc<dyn RandomEffects>) -> Self {
        Self {
            config,
            random,
            state: BackoffState::new(),
        }
    }

    /// The governing config.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Current retry counter.
    pub fn state(&self) -> BackoffState {
        self.state
    }

    /// Draw the delay for the current retry without advancing.
    pub fn next_delay(&self) -> Duration {
        self.config
            .next_delay(self.state.attempt_index(), self.random.as_ref())
    }

    /// True if `delay` has reached the cap.
    pub fn is_saturated(&self, delay: Duration) -> bool {
        delay >= self.config.cap
    }

    /// Move on to the next retry.
    pub fn advance(&mut self) {
        self.state.advance();
    }
}

impl std::fmt::Debug for BackoffScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackoffScheduler")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stratus_testkit::SequenceRandomHandler;

    fn config() -> BackoffConfig {
        BackoffConfig::new(Duration::from_millis(100), Duration::from_secs(1))
    }

    #[test]
    fn test_delay_scales_with_attempt() {
        let random = SequenceRandomHandler::constant(0.5);
        let config = config();
        assert_eq!(config.next_delay(0, &random), Duration::from_millis(50));
        assert_eq!(config.next_delay(1, &random), Duration::from_millis(100));
        assert_eq!(config.next_delay(3, &random), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_is_capped() {
        let random = SequenceRandomHandler::constant(0.5);
        assert_eq!(config().next_delay(5, &random), Duration::from_secs(1));
        assert_eq!(config().next_delay(u32::MAX, &random), Duration::from_secs(1));
    }

    #[test]
    fn test_max_exponent_bounds_jitter() {
        let random = SequenceRandomHandler::constant(0.5);
        let config = config().with_max_exponent(2);
        assert_eq!(config.next_delay(2, &random), Duration::from_millis(200));
        assert_eq!(config.next_delay(9, &random), Duration::from_millis(200));
        assert_eq!(config.max_raw_delay(9), Duration::from_millis(400));
    }

    #[test]
    fn test_default_exponent_is_unbounded() {
        let random = SequenceRandomHandler::constant(0.5);
        let config = BackoffConfig::new(Duration::from_millis(100), Duration::from_secs(1_000));
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.next_delay(8, &random), Duration::from_millis(12_800));
        assert_eq!(config.next_delay(9, &random), Duration::from_millis(25_600));
        assert_eq!(config.next_delay(10, &random), Duration::from_millis(51_200));
        assert_eq!(config.max_raw_delay(10), Duration::from_millis(102_400));
    }

    #[test]
    fn test_zero_draw_gives_zero_delay() {
        let random = SequenceRandomHandler::constant(0.0);
        assert_eq!(config().next_delay(4, &random), Duration::ZERO);
    }

    #[test]
    fn test_validate() {
        assert!(BackoffConfig::default().validate().is_ok());
        assert!(BackoffConfig::new(Duration::ZERO, Duration::from_secs(1))
            .validate()
            .is_err());
        assert!(BackoffConfig::new(Duration::from_secs(2), Duration::from_secs(1))
            .validate()
            .is_err());
        assert!(config().with_max_attempts(0).validate().is_err());
    }

    #[test]
    fn test_scheduler_advances() {
        let random = Arc::new(SequenceRandomHandler::constant(0.5));
        let mut scheduler = BackoffScheduler::new(config(), random);
        assert_eq!(scheduler.next_delay(), Duration::from_millis(50));
        scheduler.advance();
        scheduler.advance();
        assert_eq!(scheduler.state().attempt_index(), 2);
        assert_eq!(scheduler.next_delay(), Duration::from_millis(200));
        assert!(!scheduler.is_saturated(Duration::from_millis(999)));
        assert!(scheduler.is_saturated(Duration::from_secs(1)));
    }

    proptest! {
        #[test]
        fn prop_delay_never_exceeds_cap(
            base_ms in 1u64..5_000,
            cap_ms in 1u64..60_000,
            max_exponent in 0u32..80,
            attempt in any::<u32>(),
            draw in 0.0f64..1.0,
        ) {
            let config = BackoffConfig::new(
                Duration::from_millis(base_ms),
                Duration::from_millis(cap_ms),
            )
            .with_max_exponent(max_exponent);
            let random = SequenceRandomHandler::constant(draw);
            prop_assert!(config.next_delay(attempt, &random) <= config.cap);
        }

        #[test]
        fn prop_max_raw_delay_non_decreasing(
            base_ms in 1u64..5_000,
            max_exponent in 0u32..80,
            attempt in 0u32..200,
        ) {
            let config = BackoffConfig::new(
                Duration::from_millis(base_ms),
                Duration::from_secs(60),
            )
            .with_max_exponent(max_exponent);
            prop_assert!(config.max_raw_delay(attempt) <= config.max_raw_delay(attempt + 1));
        }
    }
}

//! Time effect handler - production only
//!
//! Delegates sleeping to the Tokio timer and measures elapsed time from the
//! handler's creation with Tokio's monotonic clock, so a paused test runtime
//! sees consistent sleeps and timestamps.

use async_trait::async_trait;
use std::time::Duration;
use stratus_core::TimeEffects;
use tokio::time::{self, Instant};

/// Real time handler for production use
#[derive(Debug, Clone)]
pub struct RealTimeHandler {
    origin: Instant,
}

impl RealTimeHandler {
    /// Create a handler whose `now_ms` counts from this moment.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for RealTimeHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimeEffects for RealTimeHandler {
    async fn sleep(&self, duration: Duration) {
        time::sleep(duration).await;
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_advances_clock() {
        let handler = RealTimeHandler::new();
        let before = handler.now_ms();
        handler.sleep(Duration::from_millis(250)).await;
        assert!(handler.now_ms() >= before + 250);
    }

    #[tokio::test]
    async fn test_zero_sleep_returns() {
        let handler = RealTimeHandler::default();
        handler.sleep(Duration::ZERO).await;
    }
}

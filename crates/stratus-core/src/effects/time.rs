//! Time effect interface.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `stratus-effects` (production), `stratus-testkit` (mock)
//! - **Usage**: the convergence poller's inter-attempt wait and elapsed-time logging
//!
//! Nothing outside the handler crates may sleep on the Tokio timer or read
//! the system clock directly; waits go through this trait so tests can
//! drive them without real delays.

use async_trait::async_trait;
use std::time::Duration;

/// Clock and sleep operations.
#[async_trait]
pub trait TimeEffects: Send + Sync {
    /// Suspend the current task for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Monotonic milliseconds since an arbitrary, handler-defined origin.
    fn now_ms(&self) -> u64;
}

#[async_trait]
impl<T: TimeEffects + ?Sized> TimeEffects for std::sync::Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }

    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

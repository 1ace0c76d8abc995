//! Stratus Effects - production effect handlers
//!
//! Stateless handlers implementing the effect traits from `stratus-core`
//! against the real system: Tokio timers, thread-local randomness, watch
//! channel cancellation and a `tracing`-backed presentation sink.
//!
//! **Layer Constraint**: NO mock handlers - those belong in `stratus-testkit`.
//! This is the only crate allowed to touch the system clock, the thread RNG
//! or Tokio's sleep directly (see `tests/impure_api_guard.rs`).

#![forbid(unsafe_code)]

pub mod address;
pub mod cancellation;
pub mod presentation;
pub mod random;
pub mod time;

pub use address::StaticAddressHandler;
pub use cancellation::{CancellationSource, WatchCancellationToken};
pub use presentation::TracingPresentationHandler;
pub use random::RealRandomHandler;
pub use time::RealTimeHandler;

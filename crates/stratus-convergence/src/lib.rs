//! # Stratus Convergence
//!
//! Waits for remote state to reach an expected value.
//!
//! [`BackoffConfig`] computes randomized binary-exponential delays with a
//! hard ceiling. [`ConvergencePoller`] drives a caller-supplied fetch
//! closure until the observed state matches, the backoff saturates, the
//! attempt budget runs out, the fetch fails, or the caller cancels.
//!
//! Time, randomness and cancellation are injected through the
//! `stratus-core` effect traits, so polls run identically against the
//! Tokio clock in production and a virtual clock in tests.

#![forbid(unsafe_code)]

pub mod backoff;
pub mod poller;

pub use backoff::{BackoffConfig, BackoffScheduler, BackoffState};
pub use poller::{ConvergencePoller, PollReport, PollRequest};

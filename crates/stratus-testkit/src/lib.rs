//! Stratus Testing Infrastructure
//!
//! Deterministic handlers and fixtures shared by the workspace's tests.
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! stratus-testkit = { path = "../stratus-testkit" }
//! ```
//!
//! Then in your tests:
//! ```rust,no_run
//! use stratus_testkit::*;
//!
//! let time = MockTimeHandler::new();
//! let random = SequenceRandomHandler::constant(0.5);
//! let rule = tcp_rule(22, 22, &["10.0.0.0/24"]);
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod address;
pub mod fixtures;
pub mod presentation;
pub mod query;
pub mod random;
pub mod strategies;
pub mod time;

pub use address::MockDeviceAddress;
pub use fixtures::*;
pub use presentation::{PresentedEvent, RecordingPresentationHandler};
pub use query::MockResourceQuery;
pub use random::{SeededRandomHandler, SequenceRandomHandler};
pub use time::MockTimeHandler;

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Output goes through the test harness writer so it is only shown for
/// failing tests. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .try_init();
}

//! Effect interfaces (no implementations)
//!
//! Production handlers live in `stratus-effects`; deterministic mocks live
//! in `stratus-testkit`.

pub mod presentation;
pub mod query;
pub mod random;
pub mod task;
pub mod time;

pub use presentation::{PresentationEffects, ResourcePollOutcome};
pub use query::{DeviceAddressEffects, ResourceQueryEffects};
pub use random::RandomEffects;
pub use task::{CancellationToken, NeverCancel};
pub use time::TimeEffects;

//! Presentation sink interface.
//!
//! Receives the core's results for display. The core has no knowledge of
//! how they are rendered.

use crate::errors::StratusError;
use crate::firewall::AuthorizationOutcome;
use crate::poll::PollOutcome;
use crate::resource::{ResourceId, ResourceState};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Poll outcome type published for resource lifecycle waits.
pub type ResourcePollOutcome = PollOutcome<ResourceState, StratusError>;

/// Receiver for authorization, port summary and poll results.
#[async_trait]
pub trait PresentationEffects: Send + Sync {
    /// Publish the result of a reachability check for `port`.
    async fn present_authorization(&self, port: u16, outcome: &AuthorizationOutcome);

    /// Publish the summarized set of open ports.
    async fn present_open_ports(&self, ports: &BTreeSet<String>);

    /// Publish how waiting on `resource` ended.
    async fn present_poll_outcome(&self, resource: &ResourceId, outcome: &ResourcePollOutcome);
}

//! Presentation handler that renders results as structured log events.
//!
//! Useful for headless embeddings and as the default sink before a real UI
//! binds its own.

use async_trait::async_trait;
use std::collections::BTreeSet;
use stratus_core::{
    AuthorizationOutcome, PollOutcome, PresentationEffects, ResourceId, ResourcePollOutcome,
};
use tracing::{info, warn};

/// Presentation sink that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresentationHandler;

impl TracingPresentationHandler {
    /// Create a new tracing presentation handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PresentationEffects for TracingPresentationHandler {
    async fn present_authorization(&self, port: u16, outcome: &AuthorizationOutcome) {
        match outcome {
            AuthorizationOutcome::Authorized => info!(port, "Port reachable from this device"),
            AuthorizationOutcome::PortNotExposed => warn!(port, "Port is closed"),
            AuthorizationOutcome::AddressNotAllowed { .. } => {
                warn!(port, "Port is open, but not to this device's address");
            }
        }
    }

    async fn present_open_ports(&self, ports: &BTreeSet<String>) {
        let listing: Vec<&str> = ports.iter().map(String::as_str).collect();
        info!(count = ports.len(), ports = %listing.join(","), "Open ports");
    }

    async fn present_poll_outcome(&self, resource: &ResourceId, outcome: &ResourcePollOutcome) {
        match outcome {
            PollOutcome::Converged(state) => info!(%resource, %state, "Resource reached state"),
            PollOutcome::GaveUp => warn!(%resource, "Stopped waiting for resource"),
            PollOutcome::Cancelled => info!(%resource, "Wait for resource cancelled"),
            PollOutcome::Failed(err) => warn!(%resource, error = %err, "Resource query failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::{ResourceState, StratusError};

    #[tokio::test]
    async fn test_every_outcome_is_accepted() {
        let sink = TracingPresentationHandler::new();
        let resource = ResourceId::new("i-1");
        sink.present_authorization(22, &AuthorizationOutcome::Authorized).await;
        sink.present_authorization(22, &AuthorizationOutcome::AddressNotAllowed { port: 22 })
            .await;
        sink.present_open_ports(&BTreeSet::from(["22".to_string()])).await;
        sink.present_poll_outcome(&resource, &PollOutcome::Converged(ResourceState::Stopped))
            .await;
        sink.present_poll_outcome(&resource, &PollOutcome::Failed(StratusError::query("denied")))
            .await;
    }
}

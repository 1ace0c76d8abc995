//! Presentation sink that records what it was shown.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use stratus_core::{AuthorizationOutcome, PresentationEffects, ResourceId, ResourcePollOutcome};

/// One call received by [`RecordingPresentationHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentedEvent {
    /// `present_authorization`
    Authorization {
        /// Port that was checked
        port: u16,
        /// Verdict shown
        outcome: AuthorizationOutcome,
    },
    /// `present_open_ports`
    OpenPorts(BTreeSet<String>),
    /// `present_poll_outcome`
    PollOutcome {
        /// Resource that was polled
        resource: ResourceId,
        /// Outcome shown
        outcome: ResourcePollOutcome,
    },
}

/// Records every presented event in order.
#[derive(Debug, Default)]
pub struct RecordingPresentationHandler {
    events: Mutex<Vec<PresentedEvent>>,
}

impl RecordingPresentationHandler {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<PresentedEvent> {
        self.events.lock().clone()
    }

    /// Most recent event, if any.
    pub fn last(&self) -> Option<PresentedEvent> {
        self.events.lock().last().cloned()
    }
}

#[async_trait]
impl PresentationEffects for RecordingPresentationHandler {
    async fn present_authorization(&self, port: u16, outcome: &AuthorizationOutcome) {
        self.events.lock().push(PresentedEvent::Authorization {
            port,
            outcome: *outcome,
        });
    }

    async fn present_open_ports(&self, ports: &BTreeSet<String>) {
        self.events.lock().push(PresentedEvent::OpenPorts(ports.clone()));
    }

    async fn present_poll_outcome(&self, resource: &ResourceId, outcome: &ResourcePollOutcome) {
        self.events.lock().push(PresentedEvent::PollOutcome {
            resource: resource.clone(),
            outcome: outcome.clone(),
        });
    }
}

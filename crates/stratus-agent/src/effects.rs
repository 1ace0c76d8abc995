//! Effect handler bundle shared by the agent's services.

use std::sync::Arc;
use stratus_convergence::ConvergencePoller;
use stratus_core::{
    DeviceAddressEffects, PresentationEffects, RandomEffects, ResourceQueryEffects, TimeEffects,
};
use stratus_effects::{RealRandomHandler, RealTimeHandler, TracingPresentationHandler};

/// Every capability a service may call.
///
/// The resource query and the device address lookup are always supplied by
/// the host; the rest have production defaults.
#[derive(Clone)]
pub struct AgentEffects {
    /// Cloud resource queries
    pub query: Arc<dyn ResourceQueryEffects>,
    /// This device's public address
    pub device: Arc<dyn DeviceAddressEffects>,
    /// Where results are shown
    pub presentation: Arc<dyn PresentationEffects>,
    /// Clock
    pub time: Arc<dyn TimeEffects>,
    /// Backoff jitter
    pub random: Arc<dyn RandomEffects>,
}

impl AgentEffects {
    /// Bundle explicit handlers.
    pub fn new(
        query: Arc<dyn ResourceQueryEffects>,
        device: Arc<dyn DeviceAddressEffects>,
        presentation: Arc<dyn PresentationEffects>,
        time: Arc<dyn TimeEffects>,
        random: Arc<dyn RandomEffects>,
    ) -> Self {
        Self {
            query,
            device,
            presentation,
            time,
            random,
        }
    }

    /// Production clock, randomness and log-backed presentation around the
    /// host's query and address capabilities.
    pub fn production(
        query: Arc<dyn ResourceQueryEffects>,
        device: Arc<dyn DeviceAddressEffects>,
    ) -> Self {
        Self::new(
            query,
            device,
            Arc::new(TracingPresentationHandler::new()),
            Arc::new(RealTimeHandler::new()),
            Arc::new(RealRandomHandler::new()),
        )
    }

    /// Replace the presentation sink.
    pub fn with_presentation(mut self, presentation: Arc<dyn PresentationEffects>) -> Self {
        self.presentation = presentation;
        self
    }

    /// A poller on this bundle's clock and randomness.
    pub fn poller(&self) -> ConvergencePoller {
        ConvergencePoller::new(self.time.clone(), self.random.clone())
    }
}

impl std::fmt::Debug for AgentEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentEffects").finish_non_exhaustive()
    }
}

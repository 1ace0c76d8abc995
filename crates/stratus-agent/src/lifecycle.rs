//! Start/stop a resource and wait for it to settle.

use crate::config::AgentConfig;
use crate::effects::AgentEffects;
use std::sync::Arc;
use stratus_convergence::{BackoffConfig, ConvergencePoller, PollReport, PollRequest};
use stratus_core::{
    CancellationToken, ResourceId, ResourceState, StratusError, StratusResult,
};
use tracing::info;

/// Report of a resource state poll.
pub type ResourcePollReport = PollReport<ResourceState, StratusError>;

/// Drives resource state transitions through the convergence poller.
#[derive(Debug, Clone)]
pub struct ResourceLifecycle {
    effects: AgentEffects,
    poller: ConvergencePoller,
}

impl ResourceLifecycle {
    /// Lifecycle pacing its polls with `backoff`.
    pub fn new(effects: AgentEffects, backoff: BackoffConfig) -> Self {
        let poller = effects.poller().with_default_backoff(backoff);
        Self { effects, poller }
    }

    /// Lifecycle using the `[backoff]` section of `config`.
    pub fn from_config(effects: AgentEffects, config: &AgentConfig) -> Self {
        Self::new(effects, config.backoff_config())
    }

    /// Poll `resource` until it reports `expected`, then present the outcome.
    pub async fn wait_for_state(
        &self,
        resource: &ResourceId,
        expected: ResourceState,
        cancellation: Arc<dyn CancellationToken>,
    ) -> ResourcePollReport {
        let query = self.effects.query.as_ref();
        let request = PollRequest::new(move || query.describe_resource_state(resource), expected)
            .with_cancellation(cancellation)
            .with_label(format!("{resource} -> {expected}"));

        let report = self.poller.poll(request).await;
        self.effects
            .presentation
            .present_poll_outcome(resource, &report.outcome)
            .await;
        report
    }

    /// Ask for `resource` to start and wait until it is running.
    pub async fn start_and_wait(
        &self,
        resource: &ResourceId,
        cancellation: Arc<dyn CancellationToken>,
    ) -> StratusResult<ResourcePollReport> {
        self.effects.query.start_resource(resource).await?;
        info!(%resource, "Start requested");
        Ok(self
            .wait_for_state(resource, ResourceState::Running, cancellation)
            .await)
    }

    /// Ask for `resource` to stop and wait until it is stopped.
    pub async fn stop_and_wait(
        &self,
        resource: &ResourceId,
        cancellation: Arc<dyn CancellationToken>,
    ) -> StratusResult<ResourcePollReport> {
        self.effects.query.stop_resource(resource).await?;
        info!(%resource, "Stop requested");
        Ok(self
            .wait_for_state(resource, ResourceState::Stopped, cancellation)
            .await)
    }
}

//! Reachability checks
//!
//! Fetches the account's security groups, validates them, and answers
//! whether this device's public address may reach a port.

use crate::config::ReachabilityConfig;
use crate::effects::AgentEffects;
use std::collections::BTreeSet;
use stratus_core::{
    AuthorizationOutcome, GroupFilter, Ipv4Address, SecurityGroup, StratusResult,
};
use stratus_firewall::{authorize, ingest_groups, summarize_groups};
use tracing::{debug, info};

/// Answers "can I connect?" questions against live security groups.
#[derive(Debug, Clone)]
pub struct ReachabilityService {
    effects: AgentEffects,
    filter: GroupFilter,
    probe_port: u16,
}

impl ReachabilityService {
    /// Service scoped by `config`.
    pub fn new(effects: AgentEffects, config: &ReachabilityConfig) -> Self {
        Self {
            effects,
            filter: config.group_filter(),
            probe_port: config.probe_port,
        }
    }

    /// Fetch and validate the selected security groups.
    pub async fn load_groups(&self) -> StratusResult<Vec<SecurityGroup>> {
        let records = self.effects.query.list_security_groups(&self.filter).await?;
        let groups = ingest_groups(&records)?;
        debug!(
            groups = groups.len(),
            rules = groups.iter().map(|g| g.rules.len()).sum::<usize>(),
            "Loaded security groups"
        );
        Ok(groups)
    }

    /// Authorize this device's public address for `port` and present the verdict.
    pub async fn check_port(&self, port: u16) -> StratusResult<AuthorizationOutcome> {
        let caller = self.effects.device.public_address().await?;
        self.check_port_for(port, caller).await
    }

    /// Authorize an explicit `caller` for `port` and present the verdict.
    pub async fn check_port_for(
        &self,
        port: u16,
        caller: Ipv4Address,
    ) -> StratusResult<AuthorizationOutcome> {
        let groups = self.load_groups().await?;
        let outcome = authorize(&groups, port, caller);
        info!(port, %caller, %outcome, "Reachability checked");
        self.effects
            .presentation
            .present_authorization(port, &outcome)
            .await;
        Ok(outcome)
    }

    /// [`ReachabilityService::check_port`] on the configured probe port.
    pub async fn check_probe_port(&self) -> StratusResult<AuthorizationOutcome> {
        self.check_port(self.probe_port).await
    }

    /// Present and return the exposed ports across the selected groups.
    pub async fn open_ports(&self) -> StratusResult<BTreeSet<String>> {
        let groups = self.load_groups().await?;
        let ports = summarize_groups(&groups);
        self.effects.presentation.present_open_ports(&ports).await;
        Ok(ports)
    }
}

//! Cloud resource query and device address interfaces.
//!
//! # Effect Classification
//!
//! - **Category**: Application Effect (external collaborator)
//! - **Implementation**: provided by the embedding application's cloud SDK layer
//! - **Usage**: reachability checks and resource lifecycle waits
//!
//! The core only consumes `list_security_groups` (feeding authorization and
//! port summaries) and wraps `describe_resource_state` as the fetch
//! operation of a convergence poll.

use crate::address::Ipv4Address;
use crate::errors::Result;
use crate::firewall::{GroupFilter, SecurityGroupRecord};
use crate::resource::{ResourceId, ResourceState};
use async_trait::async_trait;

/// Operations the core needs from the cloud provider.
#[async_trait]
pub trait ResourceQueryEffects: Send + Sync {
    /// List security groups selected by `filter`, unvalidated.
    async fn list_security_groups(&self, filter: &GroupFilter) -> Result<Vec<SecurityGroupRecord>>;

    /// Current lifecycle state of `resource`.
    async fn describe_resource_state(&self, resource: &ResourceId) -> Result<ResourceState>;

    /// Ask the provider to start `resource`.
    async fn start_resource(&self, resource: &ResourceId) -> Result<()>;

    /// Ask the provider to stop `resource`.
    async fn stop_resource(&self, resource: &ResourceId) -> Result<()>;
}

/// Supplies the device's own public IPv4 address.
#[async_trait]
pub trait DeviceAddressEffects: Send + Sync {
    /// The address other hosts see this device connecting from.
    async fn public_address(&self) -> Result<Ipv4Address>;
}

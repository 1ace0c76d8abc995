//! Device address lookup stub.

use async_trait::async_trait;
use stratus_core::{DeviceAddressEffects, Ipv4Address, StratusError, StratusResult};

/// Reports a fixed address, or fails when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDeviceAddress {
    address: Option<Ipv4Address>,
}

impl MockDeviceAddress {
    /// Always report `address`.
    pub fn new(address: Ipv4Address) -> Self {
        Self {
            address: Some(address),
        }
    }

    /// Lookup always fails.
    pub fn unavailable() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl DeviceAddressEffects for MockDeviceAddress {
    async fn public_address(&self) -> StratusResult<Ipv4Address> {
        self.address
            .ok_or_else(|| StratusError::query("device public address unavailable"))
    }
}

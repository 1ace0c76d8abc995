//! Device address handler with a fixed, externally supplied address.
//!
//! The embedding application discovers the public address however it likes
//! (a lookup service, the OS, user input) and hands it over here, either as
//! dotted-quad text or as a 32-bit network-order value.

use async_trait::async_trait;
use stratus_core::{DeviceAddressEffects, Ipv4Address, StratusResult};

/// Device address source that always reports the same address.
#[derive(Debug, Clone, Copy)]
pub struct StaticAddressHandler {
    address: Ipv4Address,
}

impl StaticAddressHandler {
    /// Report `address`.
    pub fn new(address: Ipv4Address) -> Self {
        Self { address }
    }

    /// Report the address decoded from dotted-quad `text`.
    pub fn parse(text: &str) -> StratusResult<Self> {
        Ipv4Address::parse(text).map(Self::new)
    }

    /// Report the address decoded from a network-order 32-bit value.
    pub fn from_bits(bits: u32) -> Self {
        Self::new(Ipv4Address::from_bits(bits))
    }
}

#[async_trait]
impl DeviceAddressEffects for StaticAddressHandler {
    async fn public_address(&self) -> StratusResult<Ipv4Address> {
        Ok(self.address)
    }
}

//! IPv4 address codec
//!
//! Dotted-quad parsing and formatting with byte-level access. Parsing is
//! strict so that every accepted string formats back to itself: exactly four
//! decimal octets, no signs, no whitespace, no leading zeros.

use crate::errors::{Result, StratusError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An IPv4 address as four ordered octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Address([u8; 4]);

impl Ipv4Address {
    /// The unspecified address `0.0.0.0`.
    pub const UNSPECIFIED: Self = Self([0, 0, 0, 0]);

    /// Build an address from its four octets.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self([a, b, c, d])
    }

    /// Build an address from an octet array.
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self(octets)
    }

    /// Decode a 32-bit value in network order (first octet most significant).
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits.to_be_bytes())
    }

    /// Encode as a 32-bit value in network order.
    pub const fn to_bits(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// All four octets.
    pub const fn octets(self) -> [u8; 4] {
        self.0
    }

    /// The octet at `index`, or `None` if `index > 3`.
    pub fn octet(self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Parse a dotted-quad string.
    pub fn parse(text: &str) -> Result<Self> {
        let mut octets = [0u8; 4];
        let mut count = 0usize;

        for token in text.split('.') {
            if count == 4 {
                return Err(StratusError::parse(format!(
                    "'{text}': expected 4 octets, found more"
                )));
            }
            octets[count] = parse_octet(text, token)?;
            count += 1;
        }

        if count != 4 {
            return Err(StratusError::parse(format!(
                "'{text}': expected 4 octets, found {count}"
            )));
        }

        Ok(Self(octets))
    }
}

fn parse_octet(text: &str, token: &str) -> Result<u8> {
    if token.is_empty() {
        return Err(StratusError::parse(format!("'{text}': empty octet")));
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StratusError::parse(format!(
            "'{text}': octet '{token}' is not a decimal number"
        )));
    }
    if token.len() > 1 && token.starts_with('0') {
        return Err(StratusError::parse(format!(
            "'{text}': octet '{token}' has a leading zero"
        )));
    }
    // At most three digits keeps the u16 parse below from overflowing.
    if token.len() > 3 {
        return Err(StratusError::parse(format!(
            "'{text}': octet '{token}' is out of range"
        )));
    }
    let value: u16 = token
        .parse()
        .map_err(|_| StratusError::parse(format!("'{text}': invalid octet '{token}'")))?;
    u8::try_from(value)
        .map_err(|_| StratusError::parse(format!("'{text}': octet '{token}' is out of range")))
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for Ipv4Address {
    type Err = StratusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<std::net::Ipv4Addr> for Ipv4Address {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Self(addr.octets())
    }
}

impl From<Ipv4Address> for std::net::Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        let [a, b, c, d] = addr.0;
        std::net::Ipv4Addr::new(a, b, c, d)
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Self(octets)
    }
}

impl Serialize for Ipv4Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

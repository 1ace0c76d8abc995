//! CIDR blocks and bit-exact prefix matching
//!
//! Matching compares whole octets first, then the leading bits of the one
//! partially covered octet using an unsigned mask. Host bits in the block's
//! base address are ignored when matching and kept for display, so
//! `10.0.0.7/24` formats back to itself.

use crate::address::Ipv4Address;
use crate::errors::{Result, StratusError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Longest valid IPv4 prefix length.
pub const MAX_PREFIX_LEN: u8 = 32;

/// An IPv4 range expressed as a base address and prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    base: Ipv4Address,
    prefix_len: u8,
}

impl CidrBlock {
    /// Build a block, rejecting prefix lengths above 32.
    pub fn new(base: Ipv4Address, prefix_len: u8) -> Result<Self> {
        if prefix_len > MAX_PREFIX_LEN {
            return Err(StratusError::validation(format!(
                "prefix length {prefix_len} exceeds {MAX_PREFIX_LEN}"
            )));
        }
        Ok(Self { base, prefix_len })
    }

    /// A block matching exactly one address.
    pub const fn host(address: Ipv4Address) -> Self {
        Self {
            base: address,
            prefix_len: MAX_PREFIX_LEN,
        }
    }

    /// The block matching every address (`0.0.0.0/0`).
    pub const fn any() -> Self {
        Self {
            base: Ipv4Address::UNSPECIFIED,
            prefix_len: 0,
        }
    }

    /// Base address as supplied (host bits are not cleared).
    pub const fn base(&self) -> Ipv4Address {
        self.base
    }

    /// Number of significant leading bits.
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// True if `address` falls inside this block.
    pub fn contains(&self, address: Ipv4Address) -> bool {
        matches(address, self)
    }

    /// Parse `a.b.c.d/n`; a bare address is treated as `/32`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once('/') {
            Some((addr, prefix)) => {
                let base = Ipv4Address::parse(addr)?;
                if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(StratusError::parse(format!(
                        "'{text}': prefix '{prefix}' is not a decimal number"
                    )));
                }
                let prefix_len: u8 = prefix.parse().map_err(|_| {
                    StratusError::validation(format!("'{text}': prefix '{prefix}' is out of range"))
                })?;
                Self::new(base, prefix_len)
            }
            None => Ok(Self::host(Ipv4Address::parse(text)?)),
        }
    }
}

/// Decide whether `address` lies inside `block`.
///
/// The first `prefix_len / 8` octets must be equal. If the prefix ends
/// inside an octet, the top `prefix_len % 8` bits of that octet must also be
/// equal. Prefix 0 matches everything; prefix 32 requires equality.
pub fn matches(address: Ipv4Address, block: &CidrBlock) -> bool {
    let n = usize::from(block.prefix_len.min(MAX_PREFIX_LEN));
    let whole = n / 8;
    let partial = n % 8;

    let addr = address.octets();
    let base = block.base.octets();

    if addr[..whole] != base[..whole] {
        return false;
    }

    if partial != 0 {
        let mask: u8 = 0xFF << (8 - partial);
        if addr[whole] & mask != base[whole] & mask {
            return false;
        }
    }

    true
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix_len)
    }
}

impl FromStr for CidrBlock {
    type Err = StratusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

//! Firewall value types
//!
//! Validated security groups and permission rules, the raw records the
//! resource query capability returns before validation, and the outcome of
//! a port authorization query.

use crate::address::Ipv4Address;
use crate::cidr::CidrBlock;
use crate::errors::{Result, StratusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// IP protocol a permission rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// TCP (`tcp`, `6`)
    Tcp,
    /// UDP (`udp`, `17`)
    Udp,
    /// ICMP (`icmp`, `1`)
    Icmp,
    /// Every protocol (`-1`, `all`)
    All,
    /// Any other protocol name or number
    Other(String),
}

impl Protocol {
    /// Decode a protocol name or number as reported by the cloud API.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tcp" | "6" => Self::Tcp,
            "udp" | "17" => Self::Udp,
            "icmp" | "1" => Self::Icmp,
            "-1" | "all" => Self::All,
            other => Self::Other(other.to_string()),
        }
    }

    /// True for protocols whose rules are scoped by port numbers.
    pub fn is_port_scoped(&self) -> bool {
        matches!(self, Self::Tcp | Self::Udp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
            Self::Icmp => write!(f, "icmp"),
            Self::All => write!(f, "all"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A validated rule exposing `from_port..=to_port` to a set of sources.
///
/// Only constructible through [`PermissionRule::new`] and friends, so it is
/// serialized for presentation but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRule {
    from_port: u16,
    to_port: u16,
    protocol: Protocol,
    sources: Vec<CidrBlock>,
}

impl PermissionRule {
    /// Build a rule, rejecting `from_port > to_port`.
    pub fn new(
        from_port: u16,
        to_port: u16,
        protocol: Protocol,
        sources: Vec<CidrBlock>,
    ) -> Result<Self> {
        if from_port > to_port {
            return Err(StratusError::validation(format!(
                "rule port range {from_port}-{to_port} is inverted"
            )));
        }
        Ok(Self {
            from_port,
            to_port,
            protocol,
            sources,
        })
    }

    /// A TCP rule for a single port.
    pub fn single_port(port: u16, sources: Vec<CidrBlock>) -> Self {
        Self {
            from_port: port,
            to_port: port,
            protocol: Protocol::Tcp,
            sources,
        }
    }

    /// First port of the range.
    pub fn from_port(&self) -> u16 {
        self.from_port
    }

    /// Last port of the range (inclusive).
    pub fn to_port(&self) -> u16 {
        self.to_port
    }

    /// Protocol the rule applies to.
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Allowed source blocks.
    pub fn sources(&self) -> &[CidrBlock] {
        &self.sources
    }

    /// True if the rule covers exactly one port.
    pub fn is_single_port(&self) -> bool {
        self.from_port == self.to_port
    }

    /// True if `port` lies inside the rule's range. An inverted range
    /// covers nothing.
    pub fn covers_port(&self, port: u16) -> bool {
        self.from_port <= port && port <= self.to_port
    }

    /// True if any source block contains `address`.
    pub fn admits(&self, address: Ipv4Address) -> bool {
        self.sources.iter().any(|block| block.contains(address))
    }
}

/// A named, ordered collection of permission rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityGroup {
    /// Provider identifier (e.g. `sg-0123`)
    pub id: String,
    /// Human-readable group name
    pub name: String,
    /// Inbound rules in provider order
    pub rules: Vec<PermissionRule>,
}

impl SecurityGroup {
    /// Create a group.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: Vec<PermissionRule>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rules,
        }
    }
}

/// Result of asking whether an address may reach a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationOutcome {
    /// Some rule exposing the port admits the address.
    Authorized,
    /// No rule exposes the port at all.
    PortNotExposed,
    /// The port is exposed, but not to this address.
    AddressNotAllowed {
        /// The port that was queried
        port: u16,
    },
}

impl AuthorizationOutcome {
    /// True only for [`AuthorizationOutcome::Authorized`].
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

impl fmt::Display for AuthorizationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorized => write!(f, "authorized"),
            Self::PortNotExposed => write!(f, "port not exposed"),
            Self::AddressNotAllowed { port } => {
                write!(f, "port {port} is open but not to this address")
            }
        }
    }
}

/// Unvalidated permission entry as returned by the cloud API.
///
/// Ports are signed because the API reports `-1` for "all" on ICMP and
/// all-traffic rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Protocol name or number
    pub protocol: String,
    /// First port, if the API supplied one
    #[serde(default)]
    pub from_port: Option<i32>,
    /// Last port, if the API supplied one
    #[serde(default)]
    pub to_port: Option<i32>,
    /// Source ranges in `a.b.c.d/n` form
    #[serde(default)]
    pub ip_ranges: Vec<String>,
}

/// Unvalidated security group as returned by the cloud API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRecord {
    /// Provider identifier
    pub group_id: String,
    /// Group name
    pub group_name: String,
    /// Inbound permissions
    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,
}

/// Selects which security groups to list. Empty fields select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    /// Group identifiers to include
    #[serde(default)]
    pub group_ids: Vec<String>,
    /// Group names to include
    #[serde(default)]
    pub group_names: Vec<String>,
}

impl GroupFilter {
    /// A filter selecting every group.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter selecting the given group ids.
    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_ids: ids.into_iter().map(Into::into).collect(),
            group_names: Vec::new(),
        }
    }

    /// True if `record` passes this filter.
    pub fn selects(&self, record: &SecurityGroupRecord) -> bool {
        let id_ok = self.group_ids.is_empty() || self.group_ids.contains(&record.group_id);
        let name_ok =
            self.group_names.is_empty() || self.group_names.contains(&record.group_name);
        id_ok && name_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_wire() {
        assert_eq!(Protocol::from_wire("tcp"), Protocol::Tcp);
        assert_eq!(Protocol::from_wire("TCP"), Protocol::Tcp);
        assert_eq!(Protocol::from_wire("17"), Protocol::Udp);
        assert_eq!(Protocol::from_wire("icmp"), Protocol::Icmp);
        assert_eq!(Protocol::from_wire("-1"), Protocol::All);
        assert_eq!(Protocol::from_wire("gre"), Protocol::Other("gre".into()));
        assert!(Protocol::Tcp.is_port_scoped());
        assert!(!Protocol::All.is_port_scoped());
    }

    #[test]
    fn test_rule_rejects_inverted_range() {
        let err = PermissionRule::new(90, 80, Protocol::Tcp, vec![]).unwrap_err();
        assert!(matches!(err, StratusError::Validation { .. }));
    }

    #[test]
    fn test_rule_covers_port() {
        let rule = PermissionRule::new(80, 90, Protocol::Tcp, vec![]).unwrap();
        assert!(rule.covers_port(80));
        assert!(rule.covers_port(85));
        assert!(rule.covers_port(90));
        assert!(!rule.covers_port(79));
        assert!(!rule.covers_port(91));
        assert!(!rule.is_single_port());
    }

    #[test]
    fn test_rule_admits() {
        let rule = PermissionRule::single_port(22, vec![CidrBlock::parse("10.0.0.0/24").unwrap()]);
        assert!(rule.admits(Ipv4Address::new(10, 0, 0, 9)));
        assert!(!rule.admits(Ipv4Address::new(10, 0, 1, 9)));
        assert!(rule.is_single_port());
    }

    #[test]
    fn test_group_filter() {
        let record = SecurityGroupRecord {
            group_id: "sg-1".into(),
            group_name: "web".into(),
            permissions: vec![],
        };
        assert!(GroupFilter::all().selects(&record));
        assert!(GroupFilter::by_ids(["sg-1"]).selects(&record));
        assert!(!GroupFilter::by_ids(["sg-2"]).selects(&record));
        let by_name = GroupFilter {
            group_ids: vec![],
            group_names: vec!["db".into()],
        };
        assert!(!by_name.selects(&record));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(AuthorizationOutcome::Authorized.to_string(), "authorized");
        assert_eq!(
            AuthorizationOutcome::AddressNotAllowed { port: 22 }.to_string(),
            "port 22 is open but not to this address"
        );
        assert!(!AuthorizationOutcome::PortNotExposed.is_authorized());
    }
}

//! Terse constructors for test data. Panic on malformed literals.

use stratus_core::{
    CidrBlock, Ipv4Address, PermissionRecord, PermissionRule, Protocol, SecurityGroup,
    SecurityGroupRecord,
};

/// Parse a dotted-quad literal.
pub fn addr(text: &str) -> Ipv4Address {
    Ipv4Address::parse(text).expect("valid address literal")
}

/// Parse a CIDR literal.
pub fn cidr(text: &str) -> CidrBlock {
    CidrBlock::parse(text).expect("valid CIDR literal")
}

/// A validated TCP rule over `from..=to` admitting `sources`.
pub fn tcp_rule(from: u16, to: u16, sources: &[&str]) -> PermissionRule {
    PermissionRule::new(from, to, Protocol::Tcp, sources.iter().map(|s| cidr(s)).collect())
        .expect("valid rule")
}

/// A validated security group.
pub fn group(id: &str, rules: Vec<PermissionRule>) -> SecurityGroup {
    SecurityGroup::new(id, id, rules)
}

/// A raw permission record as the cloud API would return it.
pub fn permission_record(
    protocol: &str,
    from: Option<i32>,
    to: Option<i32>,
    ranges: &[&str],
) -> PermissionRecord {
    PermissionRecord {
        protocol: protocol.to_string(),
        from_port: from,
        to_port: to,
        ip_ranges: ranges.iter().map(|s| s.to_string()).collect(),
    }
}

/// A raw TCP permission record over `from..=to`.
pub fn tcp_record(from: i32, to: i32, ranges: &[&str]) -> PermissionRecord {
    permission_record("tcp", Some(from), Some(to), ranges)
}

/// A raw security group record.
pub fn group_record(id: &str, name: &str, permissions: Vec<PermissionRecord>) -> SecurityGroupRecord {
    SecurityGroupRecord {
        group_id: id.to_string(),
        group_name: name.to_string(),
        permissions,
    }
}

/// The canonical fixture: SSH open to `10.0.0.0/24`, HTTP range open to all.
pub fn ssh_and_web_records() -> Vec<SecurityGroupRecord> {
    vec![
        group_record("sg-ssh", "ssh", vec![tcp_record(22, 22, &["10.0.0.0/24"])]),
        group_record("sg-web", "web", vec![tcp_record(80, 90, &["0.0.0.0/0"])]),
    ]
}

//! Security group ingestion
//!
//! Converts the raw records returned by the resource query capability into
//! validated [`SecurityGroup`]s. Inverted port ranges, out-of-range ports,
//! malformed CIDR text and port-scoped rules without ports are rejected with
//! an error before any authorization logic runs.
//!
//! Rules that do not expose ports at all (ICMP, or an unknown protocol with
//! no port range) are dropped: they can never authorize a connection.

use stratus_core::{
    CidrBlock, PermissionRecord, PermissionRule, Protocol, SecurityGroup, SecurityGroupRecord,
    StratusError, StratusResult,
};
use tracing::debug;

/// Port value the cloud API uses for "every port".
const ALL_PORTS_SENTINEL: i32 = -1;

/// Validate every record, failing on the first invalid rule.
pub fn ingest_groups(records: &[SecurityGroupRecord]) -> StratusResult<Vec<SecurityGroup>> {
    records.iter().map(ingest_group).collect()
}

/// Validate one security group record.
pub fn ingest_group(record: &SecurityGroupRecord) -> StratusResult<SecurityGroup> {
    let mut rules = Vec::with_capacity(record.permissions.len());
    for (index, permission) in record.permissions.iter().enumerate() {
        match ingest_rule(permission) {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {
                debug!(
                    group = %record.group_id,
                    rule = index,
                    protocol = %permission.protocol,
                    "Dropping rule that exposes no ports"
                );
            }
            Err(StratusError::Parse { message }) => {
                return Err(StratusError::parse(format!(
                    "group {} rule {index}: {message}",
                    record.group_id
                )));
            }
            Err(StratusError::Validation { message }) => {
                return Err(StratusError::validation(format!(
                    "group {} rule {index}: {message}",
                    record.group_id
                )));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(SecurityGroup::new(
        record.group_id.clone(),
        record.group_name.clone(),
        rules,
    ))
}

/// Validate one permission record. `Ok(None)` means the rule exposes no
/// ports and is skipped.
pub fn ingest_rule(record: &PermissionRecord) -> StratusResult<Option<PermissionRule>> {
    let protocol = Protocol::from_wire(&record.protocol);
    // ICMP carries type/code in the port fields.
    if protocol == Protocol::Icmp {
        return Ok(None);
    }

    let range = match (record.from_port, record.to_port) {
        (None, None) => None,
        (Some(ALL_PORTS_SENTINEL), Some(ALL_PORTS_SENTINEL)) => None,
        (Some(from), Some(to)) => Some((to_port_number(from)?, to_port_number(to)?)),
        (from, to) => {
            return Err(StratusError::validation(format!(
                "incomplete port range {from:?}-{to:?}"
            )));
        }
    };

    let (from_port, to_port) = match (&protocol, range) {
        (_, Some(range)) => range,
        (Protocol::All, None) => (0, u16::MAX),
        (Protocol::Other(_), None) => return Ok(None),
        (_, None) => {
            return Err(StratusError::validation(format!(
                "{protocol} rule has no port range"
            )));
        }
    };

    let sources = record
        .ip_ranges
        .iter()
        .map(|text| CidrBlock::parse(text))
        .collect::<StratusResult<Vec<_>>>()?;

    PermissionRule::new(from_port, to_port, protocol, sources).map(Some)
}

fn to_port_number(value: i32) -> StratusResult<u16> {
    u16::try_from(value)
        .map_err(|_| StratusError::validation(format!("port {value} is outside 0-65535")))
}

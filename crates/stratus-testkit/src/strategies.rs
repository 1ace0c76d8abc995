//! Proptest strategies for address and firewall types.

use proptest::collection::vec;
use proptest::prelude::*;
use stratus_core::{CidrBlock, Ipv4Address, PermissionRule, Protocol, SecurityGroup};

/// Any IPv4 address.
pub fn arb_address() -> impl Strategy<Value = Ipv4Address> {
    any::<[u8; 4]>().prop_map(Ipv4Address::from_octets)
}

/// Any CIDR block, host bits included.
pub fn arb_cidr() -> impl Strategy<Value = CidrBlock> {
    (arb_address(), 0u8..=32).prop_map(|(base, prefix)| {
        CidrBlock::new(base, prefix).expect("prefix is within range")
    })
}

/// A TCP rule with an ordered port range and up to four sources.
pub fn arb_rule() -> impl Strategy<Value = PermissionRule> {
    (any::<u16>(), any::<u16>(), vec(arb_cidr(), 0..4)).prop_map(|(a, b, sources)| {
        PermissionRule::new(a.min(b), a.max(b), Protocol::Tcp, sources)
            .expect("ordered range is valid")
    })
}

/// A narrow-port rule, so generated groups frequently overlap a target port.
pub fn arb_small_port_rule() -> impl Strategy<Value = PermissionRule> {
    (0u16..64, 0u16..8, vec(arb_cidr(), 0..4)).prop_map(|(from, width, sources)| {
        PermissionRule::new(from, from.saturating_add(width), Protocol::Tcp, sources)
            .expect("ordered range is valid")
    })
}

/// Up to four groups of up to four narrow-port rules each.
pub fn arb_groups() -> impl Strategy<Value = Vec<SecurityGroup>> {
    vec(vec(arb_small_port_rule(), 0..4), 0..4).prop_map(|groups| {
        groups
            .into_iter()
            .enumerate()
            .map(|(index, rules)| {
                let id = format!("sg-{index}");
                SecurityGroup::new(id.clone(), id, rules)
            })
            .collect()
    })
}

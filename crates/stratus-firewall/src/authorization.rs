//! Port authorization
//!
//! Decides whether a caller address may reach a port through a set of
//! security groups. The answer separates "no rule exposes this port" from
//! "the port is exposed, but not to you" so the two can be reported as
//! different, actionable failures.

use stratus_core::{AuthorizationOutcome, Ipv4Address, PermissionRule, SecurityGroup};
use tracing::trace;

/// Authorize `caller` for `target_port` against every rule in `groups`.
///
/// The first source block that admits the caller, in any rule covering the
/// port, wins. Rule order does not change the result.
pub fn authorize(
    groups: &[SecurityGroup],
    target_port: u16,
    caller: Ipv4Address,
) -> AuthorizationOutcome {
    authorize_rules(
        groups.iter().flat_map(|group| group.rules.iter()),
        target_port,
        caller,
    )
}

/// Authorize against a flat sequence of rules.
pub fn authorize_rules<'a, I>(rules: I, target_port: u16, caller: Ipv4Address) -> AuthorizationOutcome
where
    I: IntoIterator<Item = &'a PermissionRule>,
{
    let mut exposed = false;

    for rule in rules.into_iter().filter(|rule| rule.covers_port(target_port)) {
        exposed = true;
        if let Some(block) = rule.sources().iter().find(|block| block.contains(caller)) {
            trace!(port = target_port, %caller, %block, "Caller admitted");
            return AuthorizationOutcome::Authorized;
        }
    }

    if exposed {
        AuthorizationOutcome::AddressNotAllowed { port: target_port }
    } else {
        AuthorizationOutcome::PortNotExposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::{CidrBlock, Protocol};

    fn block(text: &str) -> CidrBlock {
        CidrBlock::parse(text).unwrap()
    }

    fn addr(text: &str) -> Ipv4Address {
        Ipv4Address::parse(text).unwrap()
    }

    fn ssh_group() -> Vec<SecurityGroup> {
        vec![SecurityGroup::new(
            "sg-ssh",
            "ssh",
            vec![PermissionRule::single_port(22, vec![block("10.0.0.0/24")])],
        )]
    }

    #[test]
    fn test_authorized() {
        assert_eq!(
            authorize(&ssh_group(), 22, addr("10.0.0.5")),
            AuthorizationOutcome::Authorized
        );
    }

    #[test]
    fn test_address_not_allowed() {
        assert_eq!(
            authorize(&ssh_group(), 22, addr("192.168.1.1")),
            AuthorizationOutcome::AddressNotAllowed { port: 22 }
        );
    }

    #[test]
    fn test_port_not_exposed() {
        assert_eq!(
            authorize(&ssh_group(), 23, addr("10.0.0.5")),
            AuthorizationOutcome::PortNotExposed
        );
    }

    #[test]
    fn test_no_groups() {
        assert_eq!(
            authorize(&[], 22, addr("10.0.0.5")),
            AuthorizationOutcome::PortNotExposed
        );
    }

    #[test]
    fn test_rule_without_sources_exposes_but_admits_nobody() {
        let groups = vec![SecurityGroup::new(
            "sg-1",
            "empty",
            vec![PermissionRule::single_port(443, vec![])],
        )];
        assert_eq!(
            authorize(&groups, 443, addr("1.2.3.4")),
            AuthorizationOutcome::AddressNotAllowed { port: 443 }
        );
    }

    #[test]
    fn test_later_group_can_admit() {
        let mut groups = ssh_group();
        groups.push(SecurityGroup::new(
            "sg-office",
            "office",
            vec![PermissionRule::new(20, 25, Protocol::Tcp, vec![block("192.168.1.0/24")]).unwrap()],
        ));
        assert_eq!(
            authorize(&groups, 22, addr("192.168.1.1")),
            AuthorizationOutcome::Authorized
        );
    }

    #[test]
    fn test_range_rule_boundaries() {
        let groups = vec![SecurityGroup::new(
            "sg-web",
            "web",
            vec![PermissionRule::new(8000, 8080, Protocol::Tcp, vec![CidrBlock::any()]).unwrap()],
        )];
        let caller = addr("8.8.8.8");
        assert!(authorize(&groups, 8000, caller).is_authorized());
        assert!(authorize(&groups, 8080, caller).is_authorized());
        assert_eq!(authorize(&groups, 7999, caller), AuthorizationOutcome::PortNotExposed);
        assert_eq!(authorize(&groups, 8081, caller), AuthorizationOutcome::PortNotExposed);
    }
}

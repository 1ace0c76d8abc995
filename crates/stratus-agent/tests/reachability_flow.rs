//! Reachability service against mock cloud and device handlers.

use assert_matches::assert_matches;
use std::sync::Arc;
use stratus_agent::{AgentConfig, AgentEffects, ReachabilityService, ReachabilityConfig};
use stratus_core::{AuthorizationOutcome, StratusError};
use stratus_testkit::{
    addr, group_record, init_test_tracing, ssh_and_web_records, tcp_record, MockDeviceAddress,
    MockResourceQuery, MockTimeHandler, PresentedEvent, RecordingPresentationHandler,
    SequenceRandomHandler,
};

struct Harness {
    query: Arc<MockResourceQuery>,
    presentation: Arc<RecordingPresentationHandler>,
    service: ReachabilityService,
}

fn harness(query: MockResourceQuery, device: MockDeviceAddress, config: &ReachabilityConfig) -> Harness {
    init_test_tracing();
    let query = Arc::new(query);
    let presentation = Arc::new(RecordingPresentationHandler::new());
    let effects = AgentEffects::new(
        query.clone(),
        Arc::new(device),
        presentation.clone(),
        Arc::new(MockTimeHandler::new()),
        Arc::new(SequenceRandomHandler::constant(0.5)),
    );
    Harness {
        query,
        presentation,
        service: ReachabilityService::new(effects, config),
    }
}

#[tokio::test]
async fn device_inside_ssh_range_is_authorized() {
    let h = harness(
        MockResourceQuery::new().with_groups(ssh_and_web_records()),
        MockDeviceAddress::new(addr("10.0.0.5")),
        &ReachabilityConfig::default(),
    );

    let outcome = h.service.check_probe_port().await.unwrap();

    assert_eq!(outcome, AuthorizationOutcome::Authorized);
    assert_eq!(
        h.presentation.events(),
        vec![PresentedEvent::Authorization {
            port: 22,
            outcome: AuthorizationOutcome::Authorized,
        }]
    );
}

#[tokio::test]
async fn outside_address_and_closed_port_are_distinguished() {
    let h = harness(
        MockResourceQuery::new().with_groups(ssh_and_web_records()),
        MockDeviceAddress::new(addr("192.168.1.1")),
        &ReachabilityConfig::default(),
    );

    assert_eq!(
        h.service.check_port(22).await.unwrap(),
        AuthorizationOutcome::AddressNotAllowed { port: 22 }
    );
    assert_eq!(
        h.service.check_port(23).await.unwrap(),
        AuthorizationOutcome::PortNotExposed
    );
    assert_eq!(
        h.service.check_port_for(22, addr("10.0.0.200")).await.unwrap(),
        AuthorizationOutcome::Authorized
    );
    assert_eq!(h.presentation.events().len(), 3);
}

#[tokio::test]
async fn group_filter_limits_considered_rules() {
    let config = AgentConfig::from_toml_str("[reachability]\ngroup_ids = [\"sg-web\"]\n").unwrap();
    let h = harness(
        MockResourceQuery::new().with_groups(ssh_and_web_records()),
        MockDeviceAddress::new(addr("10.0.0.5")),
        &config.reachability,
    );

    assert_eq!(
        h.service.check_port(22).await.unwrap(),
        AuthorizationOutcome::PortNotExposed
    );
    let ports: Vec<String> = h.service.open_ports().await.unwrap().into_iter().collect();
    assert_eq!(ports, vec!["80-90".to_string()]);
}

#[tokio::test]
async fn open_ports_are_presented_sorted() {
    let records = vec![
        group_record(
            "sg-a",
            "a",
            vec![
                tcp_record(8080, 8080, &["0.0.0.0/0"]),
                tcp_record(443, 443, &["0.0.0.0/0"]),
            ],
        ),
        group_record(
            "sg-b",
            "b",
            vec![
                tcp_record(22, 22, &["10.0.0.0/8"]),
                tcp_record(1000, 2000, &["10.0.0.0/8"]),
                tcp_record(22, 22, &["0.0.0.0/0"]),
            ],
        ),
    ];
    let h = harness(
        MockResourceQuery::new().with_groups(records),
        MockDeviceAddress::unavailable(),
        &ReachabilityConfig::default(),
    );

    let ports = h.service.open_ports().await.unwrap();

    let listed: Vec<&str> = ports.iter().map(String::as_str).collect();
    assert_eq!(listed, vec!["1000-2000", "22", "443", "8080"]);
    assert_eq!(h.presentation.last(), Some(PresentedEvent::OpenPorts(ports)));
}

#[tokio::test]
async fn failures_propagate_without_presenting() {
    let h = harness(
        MockResourceQuery::new().with_list_error(StratusError::permission_denied("bad key")),
        MockDeviceAddress::new(addr("10.0.0.5")),
        &ReachabilityConfig::default(),
    );
    assert_matches!(
        h.service.check_port(22).await,
        Err(StratusError::PermissionDenied { .. })
    );

    let h = harness(
        MockResourceQuery::new().with_groups(ssh_and_web_records()),
        MockDeviceAddress::unavailable(),
        &ReachabilityConfig::default(),
    );
    assert_matches!(h.service.check_port(22).await, Err(StratusError::Query { .. }));
    assert_eq!(h.query.list_calls(), 0);
    assert!(h.presentation.events().is_empty());
}

#[tokio::test]
async fn invalid_rule_is_reported_as_validation_error() {
    let records = vec![group_record(
        "sg-bad",
        "bad",
        vec![tcp_record(443, 80, &["0.0.0.0/0"])],
    )];
    let h = harness(
        MockResourceQuery::new().with_groups(records),
        MockDeviceAddress::new(addr("10.0.0.5")),
        &ReachabilityConfig::default(),
    );
    assert_matches!(h.service.open_ports().await, Err(StratusError::Validation { .. }));
}

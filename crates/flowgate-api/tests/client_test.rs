#![allow(clippy::unwrap_used)]
// Integration tests for `FloodlightClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flowgate_api::{Error, FloodlightClient, StaticFlowEntry, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FloodlightClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = FloodlightClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn arp_entry(name: &str) -> StaticFlowEntry {
    StaticFlowEntry {
        switch: "00:00:00:00:00:00:00:01".into(),
        name: name.into(),
        priority: "40000".into(),
        in_port: "3".into(),
        eth_type: "0x0806".into(),
        eth_src: None,
        eth_dst: None,
        ipv4_src: None,
        ipv4_dst: None,
        ip_proto: None,
        tcp_src: None,
        tcp_dst: None,
        udp_src: None,
        udp_dst: None,
        active: "true".into(),
        actions: "output=1".into(),
    }
}

// ── Device directory ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wm/device/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "entityClass": "DefaultEntityClass",
                "mac": ["aa:bb:cc:00:00:01"],
                "ipv4": ["10.0.0.1"],
                "vlan": [],
                "attachmentPoint": [
                    { "switchDPID": "00:00:00:00:00:00:00:01", "port": 3, "errorStatus": null }
                ]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert!(devices[0].has_mac("AA:BB:CC:00:00:01"));
    assert_eq!(devices[0].ipv4, vec!["10.0.0.1".to_owned()]);
    assert_eq!(devices[0].attachment_points[0].switch_dpid, "00:00:00:00:00:00:00:01");
    assert_eq!(devices[0].attachment_points[0].port, 3);
    assert!(devices[0].extra.contains_key("entityClass"));
}

#[tokio::test]
async fn test_list_devices_wrapped_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wm/device/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [
                {
                    "mac": ["aa:bb:cc:00:00:02"],
                    "ipv4": [],
                    "attachmentPoint": [{ "switch": "00:00:00:00:00:00:00:02", "port": "5" }]
                }
            ]
        })))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].attachment_points[0].port, 5);
}

// ── Topology ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_route_preserves_controller_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(
            "/wm/topology/route/00:00:00:00:00:00:00:01/3/00:00:00:00:00:00:00:02/5/json",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "switch": "00:00:00:00:00:00:00:01", "port": 3 },
            { "switch": "00:00:00:00:00:00:00:01", "port": 1 },
            { "switch": "00:00:00:00:00:00:00:02", "port": { "portNumber": 2 } },
            { "switch": "00:00:00:00:00:00:00:02", "port": "5" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let hops = client
        .route("00:00:00:00:00:00:00:01", 3, "00:00:00:00:00:00:00:02", 5)
        .await
        .unwrap();

    let ports: Vec<u32> = hops.iter().map(|h| h.port).collect();
    assert_eq!(ports, vec![3, 1, 2, 5]);
    assert_eq!(hops[3].switch, "00:00:00:00:00:00:00:02");
}

#[tokio::test]
async fn test_route_empty_when_unreachable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let hops = client.route("s1", 1, "s9", 1).await.unwrap();
    assert!(hops.is_empty());
}

// ── Static flows ────────────────────────────────────────────────────

#[tokio::test]
async fn test_push_flow_sends_string_fields() {
    let (server, client) = setup().await;
    let entry = arp_entry("fg-arp-fwd-0-aabbcc000001-aabbcc000002");

    Mock::given(method("POST"))
        .and(path("/wm/staticflowpusher/json"))
        .and(body_json(json!({
            "switch": "00:00:00:00:00:00:00:01",
            "name": "fg-arp-fwd-0-aabbcc000001-aabbcc000002",
            "priority": "40000",
            "in_port": "3",
            "eth_type": "0x0806",
            "active": "true",
            "actions": "output=1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "Entry pushed" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let status = client.push_flow(&entry).await.unwrap();
    assert_eq!(status.status, "Entry pushed");
}

#[tokio::test]
async fn test_push_flow_in_band_rejection() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wm/staticflowpusher/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "Error! Invalid switch DPID" })),
        )
        .mount(&server)
        .await;

    let result = client.push_flow(&arp_entry("bad")).await;

    match result {
        Err(Error::FlowRejected { ref name, ref message }) => {
            assert_eq!(name, "bad");
            assert!(message.contains("Invalid switch"), "got: {message}");
        }
        other => panic!("expected FlowRejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_flow_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/wm/staticflowpusher/json"))
        .and(body_json(json!({ "name": "fg-arp-rev-0-aabbcc000001-aabbcc000002" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "Entry fg-arp-rev-0 deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_flow("fg-arp-rev-0-aabbcc000001-aabbcc000002")
        .await
        .unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();

    match err {
        Error::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal failure");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("html")),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: Duration::from_millis(200),
        ..TransportConfig::default()
    };
    let client = FloodlightClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
}

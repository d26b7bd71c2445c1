use std::sync::Arc;

use mcp_digitalocean::{DoClient, Registry};
use mcp_digitalocean::services::Arguments;
use serde_json::{json, Map, Value};

fn registry() -> Registry {
    let client = Arc::new(DoClient::new("test-token").unwrap());
    Registry::new(client, &[]).unwrap()
}

fn arguments(value: Value) -> Arguments {
    match value {
        Value::Object(map) => Arguments::new(map),
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn unknown_tool_yields_error_result() {
    let result = registry()
        .call_tool("digitalocean-droplet-explode", &Arguments::new(Map::new()))
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content[0].text.contains("Unknown tool"));
}

#[tokio::test]
async fn missing_arguments_fail_without_an_api_call() {
    let registry = registry();
    let cases = [
        ("digitalocean-droplet-get", json!({})),
        ("digitalocean-droplet-create", json!({"Name": "web-1"})),
        ("digitalocean-domain-record-get", json!({"Domain": "example.com"})),
        ("digitalocean-firewall-get", json!({})),
        ("digitalocean-uptime-alert-get", json!({"CheckID": "abc"})),
        ("digitalocean-key-delete", json!({"ID": "not-a-number"})),
        ("digitalocean-partner-attachment-get-bgp-config", json!({})),
    ];
    for (tool, args) in cases {
        let result = registry.call_tool(tool, &arguments(args)).await.unwrap();
        assert!(result.is_error, "{tool} should reject its arguments");
        assert!(
            result.content[0].text.contains("required"),
            "{tool}: {}",
            result.content[0].text
        );
    }
}

#[tokio::test]
async fn reserved_ip_type_is_validated() {
    let result = registry()
        .call_tool(
            "digitalocean-reserved-ip-reserve",
            &arguments(json!({"Type": "ipv5", "Region": "nyc3"})),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content[0].text.contains("ipv4 or ipv6"));
}

#[tokio::test]
async fn firewall_rule_changes_require_at_least_one_rule() {
    let registry = registry();
    for tool in ["digitalocean-firewall-add-rules", "digitalocean-firewall-remove-rules"] {
        let result = registry
            .call_tool(tool, &arguments(json!({"ID": "fw-1", "InboundRules": []})))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.content[0].text.contains("at least one"));
    }
}

#[tokio::test]
async fn vpc_peering_requires_exactly_two_vpcs() {
    let result = registry()
        .call_tool(
            "digitalocean-vpc-peering-create",
            &arguments(json!({"Name": "peer", "VpcIDs": ["a"]})),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content[0].text.contains("exactly two"));
}

#[tokio::test]
async fn alert_policy_comparison_is_validated() {
    let result = registry()
        .call_tool(
            "digitalocean-alert-policy-create",
            &arguments(json!({
                "Type": "v1/insights/droplet/cpu",
                "Description": "cpu high",
                "Compare": "Above",
                "Value": 90,
                "Window": "5m",
            })),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content[0].text.contains("GreaterThan or LessThan"));
}

#[tokio::test]
async fn malformed_resource_uris_are_rejected() {
    let registry = registry();
    for uri in [
        "droplets://abc",
        "droplets://1://2",
        "keys://not-a-number",
        "actions://",
        "billing://zero",
        "billing://0",
        "billing://-1",
        "billing://4294967297",
        "invoice://4294967297",
    ] {
        let outcome = registry.read_resource(uri).await;
        assert!(
            matches!(outcome, Some(Err(_))),
            "uri {uri:?} should be claimed and rejected"
        );
    }
}

#[tokio::test]
async fn unclaimed_resource_schemes_return_none() {
    let registry = registry();
    assert!(registry.read_resource("volumes://123").await.is_none());
    assert!(registry.read_resource("not a uri").await.is_none());
}

//! Drives the JSON-RPC request handler end to end, without a network.

use std::sync::Arc;

use mcp_digitalocean::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use mcp_digitalocean::mcp::McpServer;
use mcp_digitalocean::{DoClient, Registry};
use serde_json::{json, Value};

fn server() -> McpServer {
    let client = Arc::new(DoClient::new("test-token").unwrap());
    let registry = Registry::new(client, &[]).unwrap();
    McpServer::new(registry)
}

fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).unwrap()
}

async fn respond(server: &mut McpServer, value: Value) -> Option<Value> {
    let response: Option<JsonRpcResponse> =
        server.handle_request(request(value)).await.unwrap();
    response.map(|r| serde_json::to_value(r).unwrap())
}

#[tokio::test]
async fn initialize_advertises_protocol_and_capabilities() {
    let mut server = server();
    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .await
    .unwrap();

    assert_eq!(response["id"], 1);
    let result = &response["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "mcp-digitalocean");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn initialized_notification_produces_no_response() {
    let mut server = server();
    for method in ["initialized", "notifications/initialized", "notifications/cancelled"] {
        let response = respond(
            &mut server,
            json!({"jsonrpc": "2.0", "method": method}),
        )
        .await;
        assert!(response.is_none(), "{method} should not be answered");
    }
}

#[tokio::test]
async fn ping_returns_empty_object() {
    let mut server = server();
    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 7, "method": "ping"}),
    )
    .await
    .unwrap();
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn tools_list_exposes_camel_case_schemas() {
    let mut server = server();
    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    )
    .await
    .unwrap();

    let tools = response["result"]["tools"].as_array().unwrap();
    assert!(!tools.is_empty());
    let droplet_get = tools
        .iter()
        .find(|t| t["name"] == "digitalocean-droplet-get")
        .unwrap();
    assert!(droplet_get["inputSchema"]["properties"]["ID"].is_object());
    assert!(droplet_get.get("input_schema").is_none());
}

#[tokio::test]
async fn tools_call_with_bad_arguments_returns_error_result() {
    let mut server = server();
    let response = respond(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "digitalocean-droplet-get", "arguments": {}}
        }),
    )
    .await
    .unwrap();

    let result = &response["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("ID is required"));
}

#[tokio::test]
async fn tools_call_without_params_is_invalid() {
    let mut server = server();
    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call"}),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn resources_list_and_templates_list() {
    let mut server = server();

    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"}),
    )
    .await
    .unwrap();
    let resources = response["result"]["resources"].as_array().unwrap();
    assert!(resources.iter().any(|r| r["uri"] == "account://current"));
    assert!(resources.iter().any(|r| r["uri"] == "regions://all"));
    assert!(resources
        .iter()
        .all(|r| r["mimeType"] == "application/json"));

    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 6, "method": "resources/templates/list"}),
    )
    .await
    .unwrap();
    let templates = response["result"]["resourceTemplates"].as_array().unwrap();
    assert!(templates
        .iter()
        .any(|t| t["uriTemplate"] == "droplets://{id}"));
    assert!(templates
        .iter()
        .any(|t| t["uriTemplate"] == "domains://{name}/records/{record_id}"));
}

#[tokio::test]
async fn resources_read_maps_failures_to_error_codes() {
    let mut server = server();

    // Unclaimed scheme
    let response = respond(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "resources/read",
            "params": {"uri": "volumes://123"}
        }),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32002);

    // Claimed scheme, malformed identifier
    let response = respond(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "resources/read",
            "params": {"uri": "droplets://abc"}
        }),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn unknown_method_is_reported() {
    let mut server = server();
    let response = respond(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 10, "method": "prompts/list"}),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32601);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("prompts/list"));
}

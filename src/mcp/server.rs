/// MCP server loop: JSON-RPC requests on stdin, responses on stdout.
///
/// One request per line. Notifications produce no response. All logging
/// goes to stderr so stdout stays a clean protocol stream.

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::registry::Registry;
use crate::services::{Arguments, ToolError};
use crate::ServerError;

pub struct McpServer {
    registry: Registry,
    initialized: bool,
}

impl McpServer {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            initialized: false,
        }
    }

    /// Run the server until stdin closes.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("MCP server started, waiting for JSON-RPC requests");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("stdin closed, shutting down");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await? {
                        let response_str = serde_json::to_string(&response)?;
                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                        debug!("sent response: {}", response_str);
                    }
                }
                Err(err) => {
                    error!("failed to read from stdin: {}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process_line(&mut self, line: &str) -> Result<Option<JsonRpcResponse>, ServerError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        debug!("processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                error!("failed to parse JSON-RPC request: {}", err);
                return Ok(Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {err}"),
                )));
            }
        };

        self.handle_request(request).await
    }

    pub async fn handle_request(
        &mut self,
        request: JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, ServerError> {
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id)?,
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                return Ok(None);
            }
            method if method.starts_with("notifications/") => {
                debug!("ignoring client notification: {}", method);
                return Ok(None);
            }
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => return self.handle_tools_call(request.id, request.params).await,
            "resources/list" => self.handle_resources_list(request.id),
            "resources/templates/list" => self.handle_resource_templates_list(request.id),
            "resources/read" => self.handle_resources_read(request.id, request.params).await?,
            other => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{other}' not found"),
            ),
        };

        Ok(Some(response))
    }

    fn handle_initialize(&mut self, id: Option<Value>) -> Result<JsonRpcResponse, ServerError> {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = self.registry.tools();
        debug!("listing {} tools", tools.len());
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> Result<Option<JsonRpcResponse>, ServerError> {
        let params: ToolCallParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => {
                return Ok(Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    message,
                )));
            }
        };

        let arguments = Arguments::new(params.arguments);
        let result = self.registry.call_tool(&params.name, &arguments).await?;
        Ok(Some(JsonRpcResponse::success(
            id,
            serde_json::to_value(result)?,
        )))
    }

    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "resources": self.registry.resources() }))
    }

    fn handle_resource_templates_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({ "resourceTemplates": self.registry.resource_templates() }),
        )
    }

    async fn handle_resources_read(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> Result<JsonRpcResponse, ServerError> {
        let params: ReadResourceParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    message,
                ));
            }
        };

        let response = match self.registry.read_resource(&params.uri).await {
            None => JsonRpcResponse::error(
                id,
                error_codes::RESOURCE_NOT_FOUND,
                format!("Resource '{}' not found", params.uri),
            ),
            Some(Err(ToolError::InvalidArgs(message))) => {
                JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message)
            }
            Some(Err(err)) => {
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, err.to_string())
            }
            Some(Ok(text)) => {
                let contents = ResourceContents {
                    uri: params.uri,
                    mime_type: "application/json".to_string(),
                    text,
                };
                JsonRpcResponse::success(
                    id,
                    json!({ "contents": [serde_json::to_value(contents)?] }),
                )
            }
        };
        Ok(response)
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|err| err.to_string())
}

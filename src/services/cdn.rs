/// CDN endpoint management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const CDN_URI: &str = "cdn://";

const DEFAULT_CDN_PAGE_SIZE: u32 = 20;

pub struct CdnService {
    client: Arc<DoClient>,
}

impl CdnService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn get_endpoint(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let endpoint = self.client.get(&format!("cdn/endpoints/{id}")).await?;
        render_json(&section(endpoint, "endpoint"))
    }

    async fn list_endpoints(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_CDN_PAGE_SIZE);
        let endpoints = self.client.get_paged("cdn/endpoints", page).await?;
        render_json(&section(endpoints, "endpoints"))
    }

    async fn create_endpoint(&self, args: &Arguments) -> Result<String, ToolError> {
        let origin = args.require_str("Origin")?;
        let mut body = Map::new();
        body.insert("origin".to_string(), json!(origin));
        if let Some(ttl) = args.opt_i64("TTL") {
            body.insert("ttl".to_string(), json!(ttl));
        }
        if let Some(domain) = args.opt_str("CustomDomain") {
            body.insert("custom_domain".to_string(), json!(domain));
        }
        if let Some(certificate_id) = args.opt_str("CertificateID") {
            body.insert("certificate_id".to_string(), json!(certificate_id));
        }
        let endpoint = self
            .client
            .post("cdn/endpoints", Value::Object(body))
            .await?;
        render_json(&section(endpoint, "endpoint"))
    }

    async fn delete_endpoint(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client.delete(&format!("cdn/endpoints/{id}")).await?;
        Ok("CDN endpoint deleted successfully".to_string())
    }

    /// An empty `Files` list purges the whole cache, matching the API's
    /// wildcard purge.
    async fn flush_cache(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let mut files = args.opt_str_vec("Files");
        if files.is_empty() {
            files.push("*".to_string());
        }
        self.client
            .delete_with_body(
                &format!("cdn/endpoints/{id}/cache"),
                json!({ "files": files }),
            )
            .await?;
        Ok("CDN cache flushed successfully".to_string())
    }

    async fn read_endpoint(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid CDN URI: {uri}")))?;
        let endpoint = self.client.get(&format!("cdn/endpoints/{id}")).await?;
        render_json(&section(endpoint, "endpoint"))
    }
}

#[async_trait]
impl Service for CdnService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-cdn-get",
                "Get information about a CDN endpoint by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "CDN endpoint ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-cdn-list",
                "List CDN endpoints with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-cdn-create",
                "Create a new CDN endpoint",
                json!({
                    "type": "object",
                    "properties": {
                        "Origin": {"type": "string", "description": "Fully qualified origin (a Spaces bucket)"},
                        "TTL": {"type": "number", "description": "Cache TTL in seconds"},
                        "CustomDomain": {"type": "string", "description": "Custom subdomain to serve from"},
                        "CertificateID": {"type": "string", "description": "Certificate ID for the custom domain"}
                    },
                    "required": ["Origin"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-cdn-delete",
                "Delete a CDN endpoint",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "ID of the CDN endpoint to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-cdn-flush-cache",
                "Purge cached content from a CDN endpoint",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "CDN endpoint ID"},
                        "Files": {
                            "type": "array",
                            "description": "File paths to purge; empty purges everything",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["ID"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "cdn://{id}",
            "CDN Endpoint",
            "Returns CDN endpoint information",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-cdn-get" => self.get_endpoint(args).await,
            "digitalocean-cdn-list" => self.list_endpoints(args).await,
            "digitalocean-cdn-create" => self.create_endpoint(args).await,
            "digitalocean-cdn-delete" => self.delete_endpoint(args).await,
            "digitalocean-cdn-flush-cache" => self.flush_cache(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(CDN_URI) {
            return None;
        }
        Some(self.read_endpoint(uri).await)
    }
}

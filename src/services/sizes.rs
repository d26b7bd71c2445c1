/// Droplet size listing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{section, DoClient, Page};
use crate::mcp::protocol::{ResourceInfo, ToolCallResult, ToolDefinition};
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

const DEFAULT_SIZES_PAGE_SIZE: u32 = 50;

pub struct SizeService {
    client: Arc<DoClient>,
}

impl SizeService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn list_sizes(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_SIZES_PAGE_SIZE);
        let sizes = self.client.get_paged("sizes", page).await?;
        render_json(&section(sizes, "sizes"))
    }

    async fn read_all_sizes(&self) -> Result<String, ToolError> {
        let sizes = self
            .client
            .get_paged("sizes", Page::first(DEFAULT_SIZES_PAGE_SIZE))
            .await?;
        render_json(&section(sizes, "sizes"))
    }
}

#[async_trait]
impl Service for SizeService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            "digitalocean-size-list",
            "List available droplet sizes with pagination",
            json!({
                "type": "object",
                "properties": {
                    "Page": {"type": "number", "description": "Page number", "default": 1},
                    "PerPage": {"type": "number", "description": "Items per page", "default": 50}
                }
            }),
        )]
    }

    fn resources(&self) -> Vec<ResourceInfo> {
        vec![ResourceInfo::json(
            "sizes://all",
            "Droplet Sizes",
            "Returns the list of available droplet sizes",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        match name {
            "digitalocean-size-list" => Some(into_tool_result(self.list_sizes(args).await)),
            _ => None,
        }
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if uri != "sizes://all" {
            return None;
        }
        Some(self.read_all_sizes().await)
    }
}

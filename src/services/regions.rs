/// Region listing. Registered for every activation set.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{section, DoClient, Page};
use crate::mcp::protocol::{ResourceInfo, ToolCallResult, ToolDefinition};
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

const DEFAULT_REGIONS_PAGE_SIZE: u32 = 50;

pub struct RegionService {
    client: Arc<DoClient>,
}

impl RegionService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn list_regions(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_REGIONS_PAGE_SIZE);
        let regions = self.client.get_paged("regions", page).await?;
        render_json(&section(regions, "regions"))
    }

    async fn read_all_regions(&self) -> Result<String, ToolError> {
        let regions = self
            .client
            .get_paged("regions", Page::first(DEFAULT_REGIONS_PAGE_SIZE))
            .await?;
        render_json(&section(regions, "regions"))
    }
}

#[async_trait]
impl Service for RegionService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            "digitalocean-region-list",
            "List available regions with pagination",
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
            "regions://all",
            "Regions",
            "Returns the list of available regions",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        match name {
            "digitalocean-region-list" => Some(into_tool_result(self.list_regions(args).await)),
            _ => None,
        }
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if uri != "regions://all" {
            return None;
        }
        Some(self.read_all_regions().await)
    }
}

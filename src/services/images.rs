/// Image lookup tools and the `images://` resources.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{section, DoClient, Page};
use crate::mcp::protocol::{
    ResourceInfo, ResourceTemplateInfo, ToolCallResult, ToolDefinition,
};
use crate::services::uri::extract_numeric_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const IMAGE_URI: &str = "images://";

const DEFAULT_IMAGES_PAGE_SIZE: u32 = 50;

pub struct ImageService {
    client: Arc<DoClient>,
}

impl ImageService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn list_images(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_IMAGES_PAGE_SIZE);
        let images = self.client.get_paged("images", page).await?;
        render_json(&section(images, "images"))
    }

    async fn get_image(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let image = self.client.get(&format!("images/{id}")).await?;
        render_json(&section(image, "image"))
    }

    async fn read_distribution_images(&self) -> Result<String, ToolError> {
        let images = self
            .client
            .get_paged("images?type=distribution", Page::first(DEFAULT_IMAGES_PAGE_SIZE))
            .await?;
        render_json(&section(images, "images"))
    }

    async fn read_image(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_numeric_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid image URI: {uri}")))?;
        let image = self.client.get(&format!("images/{id}")).await?;
        render_json(&section(image, "image"))
    }
}

#[async_trait]
impl Service for ImageService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-image-list",
                "List available images with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 50}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-image-get",
                "Get information about an image by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "Image ID"}
                    },
                    "required": ["ID"]
                }),
            ),
        ]
    }

    fn resources(&self) -> Vec<ResourceInfo> {
        vec![ResourceInfo::json(
            "images://distribution",
            "Distribution Images",
            "Returns the list of available distribution images",
        )]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "images://{id}",
            "Image",
            "Returns image information",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-image-list" => self.list_images(args).await,
            "digitalocean-image-get" => self.get_image(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(IMAGE_URI) {
            return None;
        }
        if uri == "images://distribution" {
            Some(self.read_distribution_images().await)
        } else {
            Some(self.read_image(uri).await)
        }
    }
}

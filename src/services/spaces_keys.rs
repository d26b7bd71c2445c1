/// Spaces access key management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient, Page};
use crate::mcp::protocol::{
    ResourceInfo, ResourceTemplateInfo, ToolCallResult, ToolDefinition,
};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const SPACES_KEYS_URI: &str = "spaces_keys://";

const DEFAULT_SPACES_KEYS_PAGE_SIZE: u32 = 20;

pub struct SpacesKeyService {
    client: Arc<DoClient>,
}

impl SpacesKeyService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn create_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        if let Some(grants) = args.opt_value("Grants") {
            body.insert("grants".to_string(), grants.clone());
        }
        let key = self.client.post("spaces/keys", Value::Object(body)).await?;
        render_json(&section(key, "key"))
    }

    async fn list_keys(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_SPACES_KEYS_PAGE_SIZE);
        let keys = self.client.get_paged("spaces/keys", page).await?;
        render_json(&section(keys, "keys"))
    }

    async fn update_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let access_key = args.require_str("AccessKey")?;
        let name = args.require_str("Name")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        if let Some(grants) = args.opt_value("Grants") {
            body.insert("grants".to_string(), grants.clone());
        }
        let key = self
            .client
            .put(&format!("spaces/keys/{access_key}"), Value::Object(body))
            .await?;
        render_json(&section(key, "key"))
    }

    async fn delete_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let access_key = args.require_str("AccessKey")?;
        self.client
            .delete(&format!("spaces/keys/{access_key}"))
            .await?;
        Ok("Spaces key deleted successfully".to_string())
    }

    async fn read_all_keys(&self) -> Result<String, ToolError> {
        let keys = self
            .client
            .get_paged("spaces/keys", Page::first(DEFAULT_SPACES_KEYS_PAGE_SIZE))
            .await?;
        render_json(&section(keys, "keys"))
    }

    async fn read_key(&self, uri: &str) -> Result<String, ToolError> {
        let access_key = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid Spaces key URI: {uri}")))?;
        let key = self
            .client
            .get(&format!("spaces/keys/{access_key}"))
            .await?;
        render_json(&section(key, "key"))
    }
}

#[async_trait]
impl Service for SpacesKeyService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-spaces-key-create",
                "Create a new Spaces access key",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Key name"},
                        "Grants": {
                            "type": "array",
                            "description": "Per-bucket permission grants",
                            "items": {"type": "object"}
                        }
                    },
                    "required": ["Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-spaces-key-list",
                "List Spaces access keys with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-spaces-key-update",
                "Update a Spaces access key",
                json!({
                    "type": "object",
                    "properties": {
                        "AccessKey": {"type": "string", "description": "Access key ID"},
                        "Name": {"type": "string", "description": "New key name"},
                        "Grants": {
                            "type": "array",
                            "description": "Per-bucket permission grants",
                            "items": {"type": "object"}
                        }
                    },
                    "required": ["AccessKey", "Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-spaces-key-delete",
                "Delete a Spaces access key",
                json!({
                    "type": "object",
                    "properties": {
                        "AccessKey": {"type": "string", "description": "Access key ID to delete"}
                    },
                    "required": ["AccessKey"]
                }),
            ),
        ]
    }

    fn resources(&self) -> Vec<ResourceInfo> {
        vec![ResourceInfo::json(
            "spaces_keys://all",
            "Spaces Keys",
            "Returns the list of Spaces access keys",
        )]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "spaces_keys://{access_key}",
            "Spaces Key",
            "Returns information about a Spaces access key",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-spaces-key-create" => self.create_key(args).await,
            "digitalocean-spaces-key-list" => self.list_keys(args).await,
            "digitalocean-spaces-key-update" => self.update_key(args).await,
            "digitalocean-spaces-key-delete" => self.delete_key(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(SPACES_KEYS_URI) {
            return None;
        }
        if uri == "spaces_keys://all" {
            Some(self.read_all_keys().await)
        } else {
            Some(self.read_key(uri).await)
        }
    }
}

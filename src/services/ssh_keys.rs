/// SSH key management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_numeric_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const SSH_KEY_URI: &str = "keys://";

const DEFAULT_SSH_KEYS_PAGE_SIZE: u32 = 30;

pub struct SshKeyService {
    client: Arc<DoClient>,
}

impl SshKeyService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn create_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let public_key = args.require_str("PublicKey")?;
        let body = json!({ "name": name, "public_key": public_key });
        let key = self.client.post("account/keys", body).await?;
        render_json(&section(key, "ssh_key"))
    }

    async fn get_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let key = self.client.get(&format!("account/keys/{id}")).await?;
        render_json(&section(key, "ssh_key"))
    }

    async fn list_keys(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_SSH_KEYS_PAGE_SIZE);
        let keys = self.client.get_paged("account/keys", page).await?;
        render_json(&section(keys, "ssh_keys"))
    }

    async fn delete_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        self.client.delete(&format!("account/keys/{id}")).await?;
        Ok("SSH key deleted successfully".to_string())
    }

    async fn read_key(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_numeric_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid SSH key URI: {uri}")))?;
        let key = self.client.get(&format!("account/keys/{id}")).await?;
        render_json(&section(key, "ssh_key"))
    }
}

#[async_trait]
impl Service for SshKeyService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-key-create",
                "Register a new SSH public key",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Key name"},
                        "PublicKey": {"type": "string", "description": "Public key in OpenSSH format"}
                    },
                    "required": ["Name", "PublicKey"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-key-get",
                "Get information about an SSH key by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "SSH key ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-key-list",
                "List SSH keys with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 30}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-key-delete",
                "Delete an SSH key",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the SSH key to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "keys://{id}",
            "SSH Key",
            "Returns SSH key information",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-key-create" => self.create_key(args).await,
            "digitalocean-key-get" => self.get_key(args).await,
            "digitalocean-key-list" => self.list_keys(args).await,
            "digitalocean-key-delete" => self.delete_key(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(SSH_KEY_URI) {
            return None;
        }
        Some(self.read_key(uri).await)
    }
}

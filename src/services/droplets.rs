/// Droplet management tools and resources.
///
/// Covers droplet CRUD, the droplet action verbs (power, resize, snapshot,
/// ...), and the `droplets://{id}` / `droplets://{id}/actions/{action_id}`
/// resources.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::{extract_numeric_id, parse_droplet_action_uri};
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const DROPLET_URI: &str = "droplets://";

const DEFAULT_DROPLETS_PAGE_SIZE: u32 = 50;

pub struct DropletService {
    client: Arc<DoClient>,
}

impl DropletService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn create_droplet(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let size = args.require_str("Size")?;
        let image_id = args.require_i64("ImageID")?;
        let region = args.require_str("Region")?;
        let backups = args.bool_or("Backup", false);
        let monitoring = args.bool_or("Monitoring", false);

        let body = json!({
            "name": name,
            "size": size,
            "image": image_id,
            "region": region,
            "backups": backups,
            "monitoring": monitoring,
        });
        let created = self.client.post("droplets", body).await?;
        render_json(&section(created, "droplet"))
    }

    async fn get_droplet(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let droplet = self.client.get(&format!("droplets/{id}")).await?;
        render_json(&section(droplet, "droplet"))
    }

    async fn list_droplets(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_DROPLETS_PAGE_SIZE);
        let droplets = self.client.get_paged("droplets", page).await?;
        render_json(&section(droplets, "droplets"))
    }

    async fn delete_droplet(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        self.client.delete(&format!("droplets/{id}")).await?;
        Ok("Droplet deleted successfully".to_string())
    }

    async fn get_droplet_action(&self, args: &Arguments) -> Result<String, ToolError> {
        let droplet_id = args.require_i64("DropletID")?;
        let action_id = args.require_i64("ActionID")?;
        let action = self
            .client
            .get(&format!("droplets/{droplet_id}/actions/{action_id}"))
            .await?;
        render_json(&section(action, "action"))
    }

    async fn list_droplet_kernels(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let page = args.page(100);
        let kernels = self
            .client
            .get_paged(&format!("droplets/{id}/kernels"), page)
            .await?;
        render_json(&section(kernels, "kernels"))
    }

    async fn list_droplet_neighbors(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let neighbors = self
            .client
            .get(&format!("droplets/{id}/neighbors"))
            .await?;
        render_json(&section(neighbors, "droplets"))
    }

    /// All droplet action verbs post to the same endpoint
    async fn droplet_action(&self, args: &Arguments, body: Value) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let action = self
            .client
            .post(&format!("droplets/{id}/actions"), body)
            .await?;
        render_json(&section(action, "action"))
    }

    async fn simple_action(&self, args: &Arguments, kind: &str) -> Result<String, ToolError> {
        self.droplet_action(args, json!({ "type": kind })).await
    }

    async fn restore(&self, args: &Arguments) -> Result<String, ToolError> {
        let image_id = args.require_i64("ImageID")?;
        self.droplet_action(args, json!({ "type": "restore", "image": image_id }))
            .await
    }

    async fn resize(&self, args: &Arguments) -> Result<String, ToolError> {
        let size = args.require_str("Size")?.to_string();
        let resize_disk = args.bool_or("ResizeDisk", false);
        self.droplet_action(
            args,
            json!({ "type": "resize", "size": size, "disk": resize_disk }),
        )
        .await
    }

    async fn rebuild(&self, args: &Arguments) -> Result<String, ToolError> {
        let image_id = args.require_i64("ImageID")?;
        self.droplet_action(args, json!({ "type": "rebuild", "image": image_id }))
            .await
    }

    async fn rename(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?.to_string();
        self.droplet_action(args, json!({ "type": "rename", "name": name }))
            .await
    }

    async fn change_kernel(&self, args: &Arguments) -> Result<String, ToolError> {
        let kernel_id = args.require_i64("KernelID")?;
        self.droplet_action(args, json!({ "type": "change_kernel", "kernel": kernel_id }))
            .await
    }

    async fn snapshot(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?.to_string();
        self.droplet_action(args, json!({ "type": "snapshot", "name": name }))
            .await
    }

    async fn read_droplet(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_numeric_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid droplet URI: {uri}")))?;
        let droplet = self.client.get(&format!("droplets/{id}")).await?;
        render_json(&section(droplet, "droplet"))
    }

    async fn read_droplet_action(&self, uri: &str) -> Result<String, ToolError> {
        let (droplet_id, action_id) = parse_droplet_action_uri(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid droplet action URI: {uri}")))?;
        let action = self
            .client
            .get(&format!("droplets/{droplet_id}/actions/{action_id}"))
            .await?;
        render_json(&section(action, "action"))
    }
}

fn droplet_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "ID": {"type": "number", "description": description}
        },
        "required": ["ID"]
    })
}

#[async_trait]
impl Service for DropletService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-droplet-create",
                "Create a new droplet",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Name of the droplet"},
                        "Size": {"type": "string", "description": "Slug of the droplet size (e.g., s-1vcpu-1gb)"},
                        "ImageID": {"type": "number", "description": "ID of the image to use"},
                        "Region": {"type": "string", "description": "Slug of the region (e.g., nyc3)"},
                        "Backup": {"type": "boolean", "description": "Whether to enable backups", "default": false},
                        "Monitoring": {"type": "boolean", "description": "Whether to enable monitoring", "default": false}
                    },
                    "required": ["Name", "Size", "ImageID", "Region"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-get",
                "Get information about a droplet by ID",
                droplet_id_schema("Droplet ID"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-list",
                "List droplets with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 50}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-delete",
                "Delete a droplet",
                droplet_id_schema("ID of the droplet to delete"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-get-action",
                "Get a droplet action by droplet ID and action ID",
                json!({
                    "type": "object",
                    "properties": {
                        "DropletID": {"type": "number", "description": "Droplet ID"},
                        "ActionID": {"type": "number", "description": "Action ID"}
                    },
                    "required": ["DropletID", "ActionID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-list-kernels",
                "List available kernels for a droplet",
                droplet_id_schema("ID of the droplet"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-list-neighbors",
                "List droplets running on the same physical hardware",
                droplet_id_schema("ID of the droplet"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-power-cycle",
                "Power cycle a droplet",
                droplet_id_schema("ID of the droplet to power cycle"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-power-on",
                "Power on a droplet",
                droplet_id_schema("ID of the droplet to power on"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-power-off",
                "Power off a droplet",
                droplet_id_schema("ID of the droplet to power off"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-shutdown",
                "Shut down a droplet",
                droplet_id_schema("ID of the droplet to shutdown"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-restore",
                "Restore a droplet from a backup or snapshot image",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the droplet to restore"},
                        "ImageID": {"type": "number", "description": "ID of the backup/snapshot image"}
                    },
                    "required": ["ID", "ImageID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-resize",
                "Resize a droplet",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the droplet to resize"},
                        "Size": {"type": "string", "description": "Slug of the new size (e.g., s-1vcpu-1gb)"},
                        "ResizeDisk": {"type": "boolean", "description": "Whether to resize the disk", "default": false}
                    },
                    "required": ["ID", "Size"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-rebuild",
                "Rebuild a droplet from an image",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the droplet to rebuild"},
                        "ImageID": {"type": "number", "description": "ID of the image to rebuild from"}
                    },
                    "required": ["ID", "ImageID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-rename",
                "Rename a droplet",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the droplet to rename"},
                        "Name": {"type": "string", "description": "New name for the droplet"}
                    },
                    "required": ["ID", "Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-change-kernel",
                "Change the kernel of a droplet",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the droplet"},
                        "KernelID": {"type": "number", "description": "ID of the kernel to switch to"}
                    },
                    "required": ["ID", "KernelID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-enable-ipv6",
                "Enable IPv6 on a droplet",
                droplet_id_schema("ID of the droplet"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-enable-backups",
                "Enable backups on a droplet",
                droplet_id_schema("ID of the droplet"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-disable-backups",
                "Disable backups on a droplet",
                droplet_id_schema("ID of the droplet"),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-snapshot",
                "Take a snapshot of a droplet",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "ID of the droplet"},
                        "Name": {"type": "string", "description": "Name for the snapshot"}
                    },
                    "required": ["ID", "Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-droplet-action-enable-private-networking",
                "Enable private networking on a droplet",
                droplet_id_schema("ID of the droplet"),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![
            ResourceTemplateInfo::json(
                "droplets://{id}",
                "Droplet",
                "Returns droplet information",
            ),
            ResourceTemplateInfo::json(
                "droplets://{id}/actions/{action_id}",
                "Droplet Action",
                "Returns information about a droplet action",
            ),
        ]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-droplet-create" => self.create_droplet(args).await,
            "digitalocean-droplet-get" => self.get_droplet(args).await,
            "digitalocean-droplet-list" => self.list_droplets(args).await,
            "digitalocean-droplet-delete" => self.delete_droplet(args).await,
            "digitalocean-droplet-get-action" => self.get_droplet_action(args).await,
            "digitalocean-droplet-list-kernels" => self.list_droplet_kernels(args).await,
            "digitalocean-droplet-list-neighbors" => self.list_droplet_neighbors(args).await,
            "digitalocean-droplet-action-power-cycle" => {
                self.simple_action(args, "power_cycle").await
            }
            "digitalocean-droplet-action-power-on" => self.simple_action(args, "power_on").await,
            "digitalocean-droplet-action-power-off" => self.simple_action(args, "power_off").await,
            "digitalocean-droplet-action-shutdown" => self.simple_action(args, "shutdown").await,
            "digitalocean-droplet-action-restore" => self.restore(args).await,
            "digitalocean-droplet-action-resize" => self.resize(args).await,
            "digitalocean-droplet-action-rebuild" => self.rebuild(args).await,
            "digitalocean-droplet-action-rename" => self.rename(args).await,
            "digitalocean-droplet-action-change-kernel" => self.change_kernel(args).await,
            "digitalocean-droplet-action-enable-ipv6" => {
                self.simple_action(args, "enable_ipv6").await
            }
            "digitalocean-droplet-action-enable-backups" => {
                self.simple_action(args, "enable_backups").await
            }
            "digitalocean-droplet-action-disable-backups" => {
                self.simple_action(args, "disable_backups").await
            }
            "digitalocean-droplet-action-snapshot" => self.snapshot(args).await,
            "digitalocean-droplet-action-enable-private-networking" => {
                self.simple_action(args, "enable_private_networking").await
            }
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(DROPLET_URI) {
            return None;
        }
        if uri.contains("/actions/") {
            Some(self.read_droplet_action(uri).await)
        } else {
            Some(self.read_droplet(uri).await)
        }
    }
}

/// VPC and VPC peering management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const VPC_URI: &str = "vpcs://";
pub const VPC_PEERING_URI: &str = "vpc_peering://";

const DEFAULT_VPCS_PAGE_SIZE: u32 = 20;

pub struct VpcService {
    client: Arc<DoClient>,
}

impl VpcService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn create_vpc(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let region = args.require_str("Region")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert("region".to_string(), json!(region));
        if let Some(ip_range) = args.opt_str("IPRange") {
            body.insert("ip_range".to_string(), json!(ip_range));
        }
        if let Some(description) = args.opt_str("Description") {
            body.insert("description".to_string(), json!(description));
        }
        let vpc = self.client.post("vpcs", Value::Object(body)).await?;
        render_json(&section(vpc, "vpc"))
    }

    async fn get_vpc(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let vpc = self.client.get(&format!("vpcs/{id}")).await?;
        render_json(&section(vpc, "vpc"))
    }

    async fn list_vpcs(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_VPCS_PAGE_SIZE);
        let vpcs = self.client.get_paged("vpcs", page).await?;
        render_json(&section(vpcs, "vpcs"))
    }

    async fn delete_vpc(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client.delete(&format!("vpcs/{id}")).await?;
        Ok("VPC deleted successfully".to_string())
    }

    async fn list_members(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let page = args.page(DEFAULT_VPCS_PAGE_SIZE);
        let members = self
            .client
            .get_paged(&format!("vpcs/{id}/members"), page)
            .await?;
        render_json(&section(members, "members"))
    }

    async fn create_peering(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let vpc_ids = args.require_str_vec("VpcIDs")?;
        if vpc_ids.len() != 2 {
            return Err(ToolError::InvalidArgs(
                "VpcIDs must contain exactly two VPC IDs".to_string(),
            ));
        }
        let body = json!({ "name": name, "vpc_ids": vpc_ids });
        let peering = self.client.post("vpcs/peerings", body).await?;
        render_json(&section(peering, "peering"))
    }

    async fn list_peerings(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_VPCS_PAGE_SIZE);
        let peerings = self.client.get_paged("vpcs/peerings", page).await?;
        render_json(&section(peerings, "peerings"))
    }

    async fn delete_peering(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client.delete(&format!("vpcs/peerings/{id}")).await?;
        Ok("VPC peering deleted successfully".to_string())
    }

    async fn read_vpc(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid VPC URI: {uri}")))?;
        let vpc = self.client.get(&format!("vpcs/{id}")).await?;
        render_json(&section(vpc, "vpc"))
    }

    async fn read_peering(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid VPC peering URI: {uri}")))?;
        let peering = self.client.get(&format!("vpcs/peerings/{id}")).await?;
        render_json(&section(peering, "peering"))
    }
}

#[async_trait]
impl Service for VpcService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-vpc-create",
                "Create a new VPC",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "VPC name"},
                        "Region": {"type": "string", "description": "Slug of the region"},
                        "IPRange": {"type": "string", "description": "Private IP range in CIDR notation"},
                        "Description": {"type": "string", "description": "Free-form description"}
                    },
                    "required": ["Name", "Region"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-get",
                "Get information about a VPC by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "VPC ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-list",
                "List VPCs with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-delete",
                "Delete a VPC",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "ID of the VPC to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-list-members",
                "List resources that are members of a VPC",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "VPC ID"},
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-peering-create",
                "Create a peering between two VPCs",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Peering name"},
                        "VpcIDs": {
                            "type": "array",
                            "description": "Exactly two VPC IDs to peer",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["Name", "VpcIDs"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-peering-list",
                "List VPC peerings with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-vpc-peering-delete",
                "Delete a VPC peering",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "ID of the peering to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![
            ResourceTemplateInfo::json("vpcs://{id}", "VPC", "Returns VPC information"),
            ResourceTemplateInfo::json(
                "vpc_peering://{id}",
                "VPC Peering",
                "Returns VPC peering information",
            ),
        ]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-vpc-create" => self.create_vpc(args).await,
            "digitalocean-vpc-get" => self.get_vpc(args).await,
            "digitalocean-vpc-list" => self.list_vpcs(args).await,
            "digitalocean-vpc-delete" => self.delete_vpc(args).await,
            "digitalocean-vpc-list-members" => self.list_members(args).await,
            "digitalocean-vpc-peering-create" => self.create_peering(args).await,
            "digitalocean-vpc-peering-list" => self.list_peerings(args).await,
            "digitalocean-vpc-peering-delete" => self.delete_peering(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if uri.starts_with(VPC_PEERING_URI) {
            Some(self.read_peering(uri).await)
        } else if uri.starts_with(VPC_URI) {
            Some(self.read_vpc(uri).await)
        } else {
            None
        }
    }
}

/// Partner network attachment management (Partner Network Connect).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const PARTNER_ATTACHMENT_URI: &str = "partner_attachment://";

const ATTACHMENTS_ROOT: &str = "partner_network_connect/attachments";
const DEFAULT_ATTACHMENTS_PAGE_SIZE: u32 = 20;

pub struct PartnerAttachmentService {
    client: Arc<DoClient>,
}

impl PartnerAttachmentService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn create_attachment(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let region = args.require_str("Region")?;
        let bandwidth = args.require_i64("ConnectionBandwidthInMbps")?;
        let naas_provider = args.require_str("NaasProvider")?;
        let vpc_ids = args.require_str_vec("VpcIDs")?;
        if vpc_ids.is_empty() {
            return Err(ToolError::InvalidArgs(
                "VpcIDs must contain at least one VPC".to_string(),
            ));
        }
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert("region".to_string(), json!(region));
        body.insert(
            "connection_bandwidth_in_mbps".to_string(),
            json!(bandwidth),
        );
        body.insert("naas_provider".to_string(), json!(naas_provider));
        body.insert("vpc_ids".to_string(), json!(vpc_ids));
        if let Some(bgp) = args.opt_value("BGP") {
            body.insert("bgp".to_string(), bgp.clone());
        }
        let attachment = self
            .client
            .post(ATTACHMENTS_ROOT, Value::Object(body))
            .await?;
        render_json(&section(attachment, "partner_attachment"))
    }

    async fn get_attachment(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let attachment = self
            .client
            .get(&format!("{ATTACHMENTS_ROOT}/{id}"))
            .await?;
        render_json(&section(attachment, "partner_attachment"))
    }

    async fn list_attachments(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_ATTACHMENTS_PAGE_SIZE);
        let attachments = self.client.get_paged(ATTACHMENTS_ROOT, page).await?;
        render_json(&section(attachments, "partner_attachments"))
    }

    async fn update_attachment(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let mut body = Map::new();
        if let Some(name) = args.opt_str("Name") {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(vpc_ids) = args.opt_value("VpcIDs") {
            body.insert("vpc_ids".to_string(), vpc_ids.clone());
        }
        if body.is_empty() {
            return Err(ToolError::InvalidArgs(
                "at least one of Name or VpcIDs is required".to_string(),
            ));
        }
        let attachment = self
            .client
            .put(&format!("{ATTACHMENTS_ROOT}/{id}"), Value::Object(body))
            .await?;
        render_json(&section(attachment, "partner_attachment"))
    }

    async fn delete_attachment(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client
            .delete(&format!("{ATTACHMENTS_ROOT}/{id}"))
            .await?;
        Ok("Partner attachment deleted successfully".to_string())
    }

    async fn get_service_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let key = self
            .client
            .get(&format!("{ATTACHMENTS_ROOT}/{id}/service_key"))
            .await?;
        render_json(&section(key, "service_key"))
    }

    async fn get_bgp_auth_key(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let key = self
            .client
            .get(&format!("{ATTACHMENTS_ROOT}/{id}/bgp_auth_key"))
            .await?;
        render_json(&section(key, "bgp_auth_key"))
    }

    async fn read_attachment(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_string_id(uri).map_err(|_| {
            ToolError::InvalidArgs(format!("invalid partner attachment URI: {uri}"))
        })?;
        let attachment = self
            .client
            .get(&format!("{ATTACHMENTS_ROOT}/{id}"))
            .await?;
        render_json(&section(attachment, "partner_attachment"))
    }
}

fn attachment_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "ID": {"type": "string", "description": description}
        },
        "required": ["ID"]
    })
}

#[async_trait]
impl Service for PartnerAttachmentService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-partner-attachment-create",
                "Create a new partner network attachment",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Attachment name"},
                        "Region": {"type": "string", "description": "Slug of the region"},
                        "ConnectionBandwidthInMbps": {"type": "number", "description": "Connection bandwidth in Mbps"},
                        "NaasProvider": {"type": "string", "description": "Network-as-a-service provider (e.g., MEGAPORT)"},
                        "VpcIDs": {
                            "type": "array",
                            "description": "VPC IDs to attach",
                            "items": {"type": "string"}
                        },
                        "BGP": {
                            "type": "object",
                            "description": "Optional BGP configuration (local/peer ASN and addresses)"
                        }
                    },
                    "required": ["Name", "Region", "ConnectionBandwidthInMbps", "NaasProvider", "VpcIDs"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-partner-attachment-get",
                "Get information about a partner attachment by ID",
                attachment_id_schema("Partner attachment ID"),
            ),
            ToolDefinition::new(
                "digitalocean-partner-attachment-list",
                "List partner attachments with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-partner-attachment-update",
                "Update the name or attached VPCs of a partner attachment",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Partner attachment ID"},
                        "Name": {"type": "string", "description": "New name"},
                        "VpcIDs": {
                            "type": "array",
                            "description": "New set of attached VPC IDs",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-partner-attachment-delete",
                "Delete a partner attachment",
                attachment_id_schema("ID of the partner attachment to delete"),
            ),
            ToolDefinition::new(
                "digitalocean-partner-attachment-get-service-key",
                "Get the service key of a partner attachment",
                attachment_id_schema("Partner attachment ID"),
            ),
            ToolDefinition::new(
                "digitalocean-partner-attachment-get-bgp-config",
                "Get the BGP auth key of a partner attachment",
                attachment_id_schema("Partner attachment ID"),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "partner_attachment://{id}",
            "Partner Attachment",
            "Returns partner network attachment information",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-partner-attachment-create" => self.create_attachment(args).await,
            "digitalocean-partner-attachment-get" => self.get_attachment(args).await,
            "digitalocean-partner-attachment-list" => self.list_attachments(args).await,
            "digitalocean-partner-attachment-update" => self.update_attachment(args).await,
            "digitalocean-partner-attachment-delete" => self.delete_attachment(args).await,
            "digitalocean-partner-attachment-get-service-key" => self.get_service_key(args).await,
            "digitalocean-partner-attachment-get-bgp-config" => {
                self.get_bgp_auth_key(args).await
            }
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(PARTNER_ATTACHMENT_URI) {
            return None;
        }
        Some(self.read_attachment(uri).await)
    }
}

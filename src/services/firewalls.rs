/// Cloud firewall management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const FIREWALL_URI: &str = "firewalls://";

const DEFAULT_FIREWALLS_PAGE_SIZE: u32 = 20;

pub struct FirewallService {
    client: Arc<DoClient>,
}

impl FirewallService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    /// Inbound/outbound rule arrays pass through untyped; at least one rule
    /// in either direction is required.
    fn rules_body(args: &Arguments) -> Result<Value, ToolError> {
        let inbound = args.opt_value("InboundRules").cloned();
        let outbound = args.opt_value("OutboundRules").cloned();
        let has_rules = |value: &Option<Value>| {
            value
                .as_ref()
                .and_then(Value::as_array)
                .map(|rules| !rules.is_empty())
                .unwrap_or(false)
        };
        if !has_rules(&inbound) && !has_rules(&outbound) {
            return Err(ToolError::InvalidArgs(
                "at least one inbound or outbound rule is required".to_string(),
            ));
        }
        let mut body = Map::new();
        if let Some(inbound) = inbound {
            body.insert("inbound_rules".to_string(), inbound);
        }
        if let Some(outbound) = outbound {
            body.insert("outbound_rules".to_string(), outbound);
        }
        Ok(Value::Object(body))
    }

    async fn create_firewall(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?.to_string();
        let mut body = match Self::rules_body(args)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.insert("name".to_string(), json!(name));
        if let Some(droplet_ids) = args.opt_value("DropletIDs") {
            body.insert("droplet_ids".to_string(), droplet_ids.clone());
        }
        let tags = args.opt_str_vec("Tags");
        if !tags.is_empty() {
            body.insert("tags".to_string(), json!(tags));
        }
        let firewall = self.client.post("firewalls", Value::Object(body)).await?;
        render_json(&section(firewall, "firewall"))
    }

    async fn get_firewall(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let firewall = self.client.get(&format!("firewalls/{id}")).await?;
        render_json(&section(firewall, "firewall"))
    }

    async fn list_firewalls(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_FIREWALLS_PAGE_SIZE);
        let firewalls = self.client.get_paged("firewalls", page).await?;
        render_json(&section(firewalls, "firewalls"))
    }

    async fn delete_firewall(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client.delete(&format!("firewalls/{id}")).await?;
        Ok("Firewall deleted successfully".to_string())
    }

    async fn change_droplets(
        &self,
        args: &Arguments,
        add: bool,
    ) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let droplet_ids = args.require_i64_vec("DropletIDs")?;
        if droplet_ids.is_empty() {
            return Err(ToolError::InvalidArgs(
                "DropletIDs must contain at least one droplet".to_string(),
            ));
        }
        let path = format!("firewalls/{id}/droplets");
        let body = json!({ "droplet_ids": droplet_ids });
        if add {
            self.client.post(&path, body).await?;
            Ok("Droplets added to firewall successfully".to_string())
        } else {
            self.client.delete_with_body(&path, body).await?;
            Ok("Droplets removed from firewall successfully".to_string())
        }
    }

    async fn change_tags(&self, args: &Arguments, add: bool) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let tags = args.require_str_vec("Tags")?;
        if tags.is_empty() {
            return Err(ToolError::InvalidArgs(
                "Tags must contain at least one tag".to_string(),
            ));
        }
        let path = format!("firewalls/{id}/tags");
        let body = json!({ "tags": tags });
        if add {
            self.client.post(&path, body).await?;
            Ok("Tags added to firewall successfully".to_string())
        } else {
            self.client.delete_with_body(&path, body).await?;
            Ok("Tags removed from firewall successfully".to_string())
        }
    }

    async fn change_rules(&self, args: &Arguments, add: bool) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let body = Self::rules_body(args)?;
        let path = format!("firewalls/{id}/rules");
        if add {
            self.client.post(&path, body).await?;
            Ok("Rules added to firewall successfully".to_string())
        } else {
            self.client.delete_with_body(&path, body).await?;
            Ok("Rules removed from firewall successfully".to_string())
        }
    }

    async fn read_firewall(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid firewall URI: {uri}")))?;
        let firewall = self.client.get(&format!("firewalls/{id}")).await?;
        render_json(&section(firewall, "firewall"))
    }
}

fn rules_properties() -> Value {
    json!({
        "ID": {"type": "string", "description": "Firewall ID"},
        "InboundRules": {
            "type": "array",
            "description": "Inbound rules (protocol, ports, sources)",
            "items": {"type": "object"}
        },
        "OutboundRules": {
            "type": "array",
            "description": "Outbound rules (protocol, ports, destinations)",
            "items": {"type": "object"}
        }
    })
}

#[async_trait]
impl Service for FirewallService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-firewall-create",
                "Create a new firewall",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Firewall name"},
                        "InboundRules": {
                            "type": "array",
                            "description": "Inbound rules (protocol, ports, sources)",
                            "items": {"type": "object"}
                        },
                        "OutboundRules": {
                            "type": "array",
                            "description": "Outbound rules (protocol, ports, destinations)",
                            "items": {"type": "object"}
                        },
                        "DropletIDs": {
                            "type": "array",
                            "description": "IDs of droplets to place behind the firewall",
                            "items": {"type": "number"}
                        },
                        "Tags": {
                            "type": "array",
                            "description": "Tags whose droplets are placed behind the firewall",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-get",
                "Get information about a firewall by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Firewall ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-list",
                "List firewalls with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-delete",
                "Delete a firewall",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "ID of the firewall to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-add-droplets",
                "Add droplets to a firewall",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Firewall ID"},
                        "DropletIDs": {
                            "type": "array",
                            "description": "IDs of droplets to add",
                            "items": {"type": "number"}
                        }
                    },
                    "required": ["ID", "DropletIDs"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-remove-droplets",
                "Remove droplets from a firewall",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Firewall ID"},
                        "DropletIDs": {
                            "type": "array",
                            "description": "IDs of droplets to remove",
                            "items": {"type": "number"}
                        }
                    },
                    "required": ["ID", "DropletIDs"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-add-tags",
                "Add tags to a firewall",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Firewall ID"},
                        "Tags": {
                            "type": "array",
                            "description": "Tags to add",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["ID", "Tags"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-remove-tags",
                "Remove tags from a firewall",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Firewall ID"},
                        "Tags": {
                            "type": "array",
                            "description": "Tags to remove",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["ID", "Tags"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-add-rules",
                "Add rules to a firewall",
                json!({
                    "type": "object",
                    "properties": rules_properties(),
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-firewall-remove-rules",
                "Remove rules from a firewall",
                json!({
                    "type": "object",
                    "properties": rules_properties(),
                    "required": ["ID"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "firewalls://{id}",
            "Firewall",
            "Returns firewall information",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-firewall-create" => self.create_firewall(args).await,
            "digitalocean-firewall-get" => self.get_firewall(args).await,
            "digitalocean-firewall-list" => self.list_firewalls(args).await,
            "digitalocean-firewall-delete" => self.delete_firewall(args).await,
            "digitalocean-firewall-add-droplets" => self.change_droplets(args, true).await,
            "digitalocean-firewall-remove-droplets" => self.change_droplets(args, false).await,
            "digitalocean-firewall-add-tags" => self.change_tags(args, true).await,
            "digitalocean-firewall-remove-tags" => self.change_tags(args, false).await,
            "digitalocean-firewall-add-rules" => self.change_rules(args, true).await,
            "digitalocean-firewall-remove-rules" => self.change_rules(args, false).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(FIREWALL_URI) {
            return None;
        }
        Some(self.read_firewall(uri).await)
    }
}

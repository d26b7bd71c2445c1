/// Reserved IP management, covering both IPv4 and IPv6 addresses.
///
/// Most tools take a `Type` argument of `ipv4` or `ipv6` and route to the
/// matching API root (`reserved_ips` or `reserved_ipv6`).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const RESERVED_IPV4_URI: &str = "reserved_ipv4://";
pub const RESERVED_IPV6_URI: &str = "reserved_ipv6://";

const DEFAULT_RESERVED_IPS_PAGE_SIZE: u32 = 20;

/// API root and envelope keys for one address family
struct IpFamily {
    root: &'static str,
    singular: &'static str,
    plural: &'static str,
}

const IPV4: IpFamily = IpFamily {
    root: "reserved_ips",
    singular: "reserved_ip",
    plural: "reserved_ips",
};

const IPV6: IpFamily = IpFamily {
    root: "reserved_ipv6",
    singular: "reserved_ipv6",
    plural: "reserved_ipv6s",
};

fn family(args: &Arguments) -> Result<&'static IpFamily, ToolError> {
    match args.require_str("Type")? {
        "ipv4" => Ok(&IPV4),
        "ipv6" => Ok(&IPV6),
        other => Err(ToolError::InvalidArgs(format!(
            "Type must be ipv4 or ipv6, got {other}"
        ))),
    }
}

pub struct ReservedIpService {
    client: Arc<DoClient>,
}

impl ReservedIpService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn reserve(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let region = args.require_str("Region")?;
        let body = if fam.root == IPV6.root {
            json!({ "region_slug": region })
        } else {
            json!({ "region": region })
        };
        let reserved = self.client.post(fam.root, body).await?;
        render_json(&section(reserved, fam.singular))
    }

    async fn release(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let ip = args.require_str("IP")?;
        self.client.delete(&format!("{}/{ip}", fam.root)).await?;
        Ok("Reserved IP released successfully".to_string())
    }

    async fn get(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let ip = args.require_str("IP")?;
        let reserved = self.client.get(&format!("{}/{ip}", fam.root)).await?;
        render_json(&section(reserved, fam.singular))
    }

    async fn list(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let page = args.page(DEFAULT_RESERVED_IPS_PAGE_SIZE);
        let reserved = self.client.get_paged(fam.root, page).await?;
        render_json(&section(reserved, fam.plural))
    }

    async fn assign(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let ip = args.require_str("IP")?;
        let droplet_id = args.require_i64("DropletID")?;
        let action = self
            .client
            .post(
                &format!("{}/{ip}/actions", fam.root),
                json!({ "type": "assign", "droplet_id": droplet_id }),
            )
            .await?;
        render_json(&section(action, "action"))
    }

    async fn unassign(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let ip = args.require_str("IP")?;
        let action = self
            .client
            .post(
                &format!("{}/{ip}/actions", fam.root),
                json!({ "type": "unassign" }),
            )
            .await?;
        render_json(&section(action, "action"))
    }

    async fn get_action(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let ip = args.require_str("IP")?;
        let action_id = args.require_i64("ActionID")?;
        let action = self
            .client
            .get(&format!("{}/{ip}/actions/{action_id}", fam.root))
            .await?;
        render_json(&section(action, "action"))
    }

    async fn list_actions(&self, args: &Arguments) -> Result<String, ToolError> {
        let fam = family(args)?;
        let ip = args.require_str("IP")?;
        let page = args.page(DEFAULT_RESERVED_IPS_PAGE_SIZE);
        let actions = self
            .client
            .get_paged(&format!("{}/{ip}/actions", fam.root), page)
            .await?;
        render_json(&section(actions, "actions"))
    }

    async fn read_reserved_ip(&self, uri: &str, fam: &IpFamily) -> Result<String, ToolError> {
        let ip = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid reserved IP URI: {uri}")))?;
        let reserved = self.client.get(&format!("{}/{ip}", fam.root)).await?;
        render_json(&section(reserved, fam.singular))
    }
}

fn typed_ip_properties() -> serde_json::Value {
    json!({
        "Type": {"type": "string", "description": "Address family: ipv4 or ipv6", "enum": ["ipv4", "ipv6"]},
        "IP": {"type": "string", "description": "Reserved IP address"}
    })
}

#[async_trait]
impl Service for ReservedIpService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-reserved-ip-reserve",
                "Reserve a new IP in a region",
                json!({
                    "type": "object",
                    "properties": {
                        "Type": {"type": "string", "description": "Address family: ipv4 or ipv6", "enum": ["ipv4", "ipv6"]},
                        "Region": {"type": "string", "description": "Slug of the region to reserve in"}
                    },
                    "required": ["Type", "Region"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-release",
                "Release a reserved IP",
                json!({
                    "type": "object",
                    "properties": typed_ip_properties(),
                    "required": ["Type", "IP"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-get",
                "Get information about a reserved IP",
                json!({
                    "type": "object",
                    "properties": typed_ip_properties(),
                    "required": ["Type", "IP"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-list",
                "List reserved IPs with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Type": {"type": "string", "description": "Address family: ipv4 or ipv6", "enum": ["ipv4", "ipv6"]},
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    },
                    "required": ["Type"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-assign",
                "Assign a reserved IP to a droplet",
                json!({
                    "type": "object",
                    "properties": {
                        "Type": {"type": "string", "description": "Address family: ipv4 or ipv6", "enum": ["ipv4", "ipv6"]},
                        "IP": {"type": "string", "description": "Reserved IP address"},
                        "DropletID": {"type": "number", "description": "ID of the droplet to assign to"}
                    },
                    "required": ["Type", "IP", "DropletID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-unassign",
                "Unassign a reserved IP from its droplet",
                json!({
                    "type": "object",
                    "properties": typed_ip_properties(),
                    "required": ["Type", "IP"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-get-action",
                "Get an action performed on a reserved IP",
                json!({
                    "type": "object",
                    "properties": {
                        "Type": {"type": "string", "description": "Address family: ipv4 or ipv6", "enum": ["ipv4", "ipv6"]},
                        "IP": {"type": "string", "description": "Reserved IP address"},
                        "ActionID": {"type": "number", "description": "Action ID"}
                    },
                    "required": ["Type", "IP", "ActionID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-reserved-ip-list-actions",
                "List actions performed on a reserved IP",
                json!({
                    "type": "object",
                    "properties": {
                        "Type": {"type": "string", "description": "Address family: ipv4 or ipv6", "enum": ["ipv4", "ipv6"]},
                        "IP": {"type": "string", "description": "Reserved IP address"},
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    },
                    "required": ["Type", "IP"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![
            ResourceTemplateInfo::json(
                "reserved_ipv4://{ip}",
                "Reserved IPv4",
                "Returns information about a reserved IPv4 address",
            ),
            ResourceTemplateInfo::json(
                "reserved_ipv6://{ip}",
                "Reserved IPv6",
                "Returns information about a reserved IPv6 address",
            ),
        ]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-reserved-ip-reserve" => self.reserve(args).await,
            "digitalocean-reserved-ip-release" => self.release(args).await,
            "digitalocean-reserved-ip-get" => self.get(args).await,
            "digitalocean-reserved-ip-list" => self.list(args).await,
            "digitalocean-reserved-ip-assign" => self.assign(args).await,
            "digitalocean-reserved-ip-unassign" => self.unassign(args).await,
            "digitalocean-reserved-ip-get-action" => self.get_action(args).await,
            "digitalocean-reserved-ip-list-actions" => self.list_actions(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if uri.starts_with(RESERVED_IPV4_URI) {
            Some(self.read_reserved_ip(uri, &IPV4).await)
        } else if uri.starts_with(RESERVED_IPV6_URI) {
            Some(self.read_reserved_ip(uri, &IPV6).await)
        } else {
            None
        }
    }
}

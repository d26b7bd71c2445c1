/// Domain and DNS record management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::{extract_string_id, parse_domain_record_uri};
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const DOMAIN_URI: &str = "domains://";

const DEFAULT_DOMAINS_PAGE_SIZE: u32 = 20;

pub struct DomainService {
    client: Arc<DoClient>,
}

impl DomainService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn create_domain(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        if let Some(ip) = args.opt_str("IPAddress") {
            body.insert("ip_address".to_string(), json!(ip));
        }
        let domain = self.client.post("domains", Value::Object(body)).await?;
        render_json(&section(domain, "domain"))
    }

    async fn get_domain(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let domain = self.client.get(&format!("domains/{name}")).await?;
        render_json(&section(domain, "domain"))
    }

    async fn list_domains(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_DOMAINS_PAGE_SIZE);
        let domains = self.client.get_paged("domains", page).await?;
        render_json(&section(domains, "domains"))
    }

    async fn delete_domain(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        self.client.delete(&format!("domains/{name}")).await?;
        Ok("Domain deleted successfully".to_string())
    }

    fn record_body(args: &Arguments) -> Result<Value, ToolError> {
        let kind = args.require_str("Type")?;
        let name = args.require_str("Name")?;
        let data = args.require_str("Data")?;
        let mut body = Map::new();
        body.insert("type".to_string(), json!(kind));
        body.insert("name".to_string(), json!(name));
        body.insert("data".to_string(), json!(data));
        if let Some(priority) = args.opt_i64("Priority") {
            body.insert("priority".to_string(), json!(priority));
        }
        if let Some(port) = args.opt_i64("Port") {
            body.insert("port".to_string(), json!(port));
        }
        if let Some(ttl) = args.opt_i64("TTL") {
            body.insert("ttl".to_string(), json!(ttl));
        }
        if let Some(weight) = args.opt_i64("Weight") {
            body.insert("weight".to_string(), json!(weight));
        }
        Ok(Value::Object(body))
    }

    async fn create_record(&self, args: &Arguments) -> Result<String, ToolError> {
        let domain = args.require_str("Domain")?.to_string();
        let body = Self::record_body(args)?;
        let record = self
            .client
            .post(&format!("domains/{domain}/records"), body)
            .await?;
        render_json(&section(record, "domain_record"))
    }

    async fn get_record(&self, args: &Arguments) -> Result<String, ToolError> {
        let domain = args.require_str("Domain")?;
        let record_id = args.require_i64("RecordID")?;
        let record = self
            .client
            .get(&format!("domains/{domain}/records/{record_id}"))
            .await?;
        render_json(&section(record, "domain_record"))
    }

    async fn list_records(&self, args: &Arguments) -> Result<String, ToolError> {
        let domain = args.require_str("Domain")?;
        let page = args.page(DEFAULT_DOMAINS_PAGE_SIZE);
        let records = self
            .client
            .get_paged(&format!("domains/{domain}/records"), page)
            .await?;
        render_json(&section(records, "domain_records"))
    }

    async fn update_record(&self, args: &Arguments) -> Result<String, ToolError> {
        let domain = args.require_str("Domain")?.to_string();
        let record_id = args.require_i64("RecordID")?;
        let body = Self::record_body(args)?;
        let record = self
            .client
            .put(&format!("domains/{domain}/records/{record_id}"), body)
            .await?;
        render_json(&section(record, "domain_record"))
    }

    async fn delete_record(&self, args: &Arguments) -> Result<String, ToolError> {
        let domain = args.require_str("Domain")?;
        let record_id = args.require_i64("RecordID")?;
        self.client
            .delete(&format!("domains/{domain}/records/{record_id}"))
            .await?;
        Ok("Domain record deleted successfully".to_string())
    }

    async fn read_domain(&self, uri: &str) -> Result<String, ToolError> {
        let name = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid domain URI: {uri}")))?;
        let domain = self.client.get(&format!("domains/{name}")).await?;
        render_json(&section(domain, "domain"))
    }

    async fn read_record(&self, uri: &str) -> Result<String, ToolError> {
        let (domain, record_id) = parse_domain_record_uri(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid domain record URI: {uri}")))?;
        let record = self
            .client
            .get(&format!("domains/{domain}/records/{record_id}"))
            .await?;
        render_json(&section(record, "domain_record"))
    }
}

fn record_properties() -> Value {
    json!({
        "Domain": {"type": "string", "description": "Domain name"},
        "Type": {"type": "string", "description": "Record type (A, AAAA, CNAME, MX, TXT, NS, SRV, CAA)"},
        "Name": {"type": "string", "description": "Record host name"},
        "Data": {"type": "string", "description": "Record value"},
        "Priority": {"type": "number", "description": "Priority (MX and SRV records)"},
        "Port": {"type": "number", "description": "Port (SRV records)"},
        "TTL": {"type": "number", "description": "Time to live in seconds"},
        "Weight": {"type": "number", "description": "Weight (SRV records)"}
    })
}

#[async_trait]
impl Service for DomainService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-domain-create",
                "Create a new domain",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Domain name"},
                        "IPAddress": {"type": "string", "description": "Optional IP address for an initial A record"}
                    },
                    "required": ["Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-get",
                "Get information about a domain",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Domain name"}
                    },
                    "required": ["Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-list",
                "List domains with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-delete",
                "Delete a domain",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Name of the domain to delete"}
                    },
                    "required": ["Name"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-record-create",
                "Create a DNS record in a domain",
                json!({
                    "type": "object",
                    "properties": record_properties(),
                    "required": ["Domain", "Type", "Name", "Data"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-record-get",
                "Get a DNS record by domain name and record ID",
                json!({
                    "type": "object",
                    "properties": {
                        "Domain": {"type": "string", "description": "Domain name"},
                        "RecordID": {"type": "number", "description": "Record ID"}
                    },
                    "required": ["Domain", "RecordID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-record-list",
                "List DNS records of a domain with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Domain": {"type": "string", "description": "Domain name"},
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    },
                    "required": ["Domain"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-record-update",
                "Update a DNS record",
                json!({
                    "type": "object",
                    "properties": {
                        "RecordID": {"type": "number", "description": "ID of the record to update"},
                        "Domain": {"type": "string", "description": "Domain name"},
                        "Type": {"type": "string", "description": "Record type (A, AAAA, CNAME, MX, TXT, NS, SRV, CAA)"},
                        "Name": {"type": "string", "description": "Record host name"},
                        "Data": {"type": "string", "description": "Record value"},
                        "Priority": {"type": "number", "description": "Priority (MX and SRV records)"},
                        "Port": {"type": "number", "description": "Port (SRV records)"},
                        "TTL": {"type": "number", "description": "Time to live in seconds"},
                        "Weight": {"type": "number", "description": "Weight (SRV records)"}
                    },
                    "required": ["Domain", "RecordID", "Type", "Name", "Data"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-domain-record-delete",
                "Delete a DNS record",
                json!({
                    "type": "object",
                    "properties": {
                        "Domain": {"type": "string", "description": "Domain name"},
                        "RecordID": {"type": "number", "description": "ID of the record to delete"}
                    },
                    "required": ["Domain", "RecordID"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![
            ResourceTemplateInfo::json(
                "domains://{name}",
                "Domain",
                "Returns domain information",
            ),
            ResourceTemplateInfo::json(
                "domains://{name}/records/{record_id}",
                "Domain Record",
                "Returns a DNS record of a domain",
            ),
        ]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-domain-create" => self.create_domain(args).await,
            "digitalocean-domain-get" => self.get_domain(args).await,
            "digitalocean-domain-list" => self.list_domains(args).await,
            "digitalocean-domain-delete" => self.delete_domain(args).await,
            "digitalocean-domain-record-create" => self.create_record(args).await,
            "digitalocean-domain-record-get" => self.get_record(args).await,
            "digitalocean-domain-record-list" => self.list_records(args).await,
            "digitalocean-domain-record-update" => self.update_record(args).await,
            "digitalocean-domain-record-delete" => self.delete_record(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(DOMAIN_URI) {
            return None;
        }
        if uri.contains("/records/") {
            Some(self.read_record(uri).await)
        } else {
            Some(self.read_domain(uri).await)
        }
    }
}

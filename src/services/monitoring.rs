/// Monitoring alert policy management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ToolCallResult, ToolDefinition};
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

const DEFAULT_MONITORING_PAGE_SIZE: u32 = 20;

pub struct MonitoringService {
    client: Arc<DoClient>,
}

impl MonitoringService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    fn policy_body(args: &Arguments) -> Result<Value, ToolError> {
        let kind = args.require_str("Type")?;
        let description = args.require_str("Description")?;
        let compare = args.require_str("Compare")?;
        if compare != "GreaterThan" && compare != "LessThan" {
            return Err(ToolError::InvalidArgs(format!(
                "Compare must be GreaterThan or LessThan, got {compare}"
            )));
        }
        let value = args
            .opt_f64("Value")
            .ok_or_else(|| ToolError::InvalidArgs("Value is required".to_string()))?;
        let window = args.require_str("Window")?;

        let mut body = Map::new();
        body.insert("type".to_string(), json!(kind));
        body.insert("description".to_string(), json!(description));
        body.insert("compare".to_string(), json!(compare));
        body.insert("value".to_string(), json!(value));
        body.insert("window".to_string(), json!(window));
        let entities = args.opt_str_vec("Entities");
        if !entities.is_empty() {
            body.insert("entities".to_string(), json!(entities));
        }
        let tags = args.opt_str_vec("Tags");
        if !tags.is_empty() {
            body.insert("tags".to_string(), json!(tags));
        }
        if let Some(alerts) = args.opt_value("Alerts") {
            body.insert("alerts".to_string(), alerts.clone());
        }
        body.insert("enabled".to_string(), json!(args.bool_or("Enabled", true)));
        Ok(Value::Object(body))
    }

    async fn create_policy(&self, args: &Arguments) -> Result<String, ToolError> {
        let body = Self::policy_body(args)?;
        let policy = self.client.post("monitoring/alerts", body).await?;
        render_json(&section(policy, "policy"))
    }

    async fn get_policy(&self, args: &Arguments) -> Result<String, ToolError> {
        let uuid = args.require_str("UUID")?;
        let policy = self.client.get(&format!("monitoring/alerts/{uuid}")).await?;
        render_json(&section(policy, "policy"))
    }

    async fn list_policies(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_MONITORING_PAGE_SIZE);
        let policies = self.client.get_paged("monitoring/alerts", page).await?;
        render_json(&section(policies, "policies"))
    }

    async fn update_policy(&self, args: &Arguments) -> Result<String, ToolError> {
        let uuid = args.require_str("UUID")?.to_string();
        let body = Self::policy_body(args)?;
        let policy = self
            .client
            .put(&format!("monitoring/alerts/{uuid}"), body)
            .await?;
        render_json(&section(policy, "policy"))
    }

    async fn delete_policy(&self, args: &Arguments) -> Result<String, ToolError> {
        let uuid = args.require_str("UUID")?;
        self.client
            .delete(&format!("monitoring/alerts/{uuid}"))
            .await?;
        Ok("Alert policy deleted successfully".to_string())
    }
}

fn policy_properties() -> Value {
    json!({
        "Type": {"type": "string", "description": "Metric type (e.g., v1/insights/droplet/cpu)"},
        "Description": {"type": "string", "description": "Policy description"},
        "Compare": {"type": "string", "description": "Comparison operator", "enum": ["GreaterThan", "LessThan"]},
        "Value": {"type": "number", "description": "Threshold value"},
        "Window": {"type": "string", "description": "Evaluation window (5m, 10m, 30m, 1h)"},
        "Entities": {
            "type": "array",
            "description": "Droplet IDs the policy applies to",
            "items": {"type": "string"}
        },
        "Tags": {
            "type": "array",
            "description": "Tags whose droplets the policy applies to",
            "items": {"type": "string"}
        },
        "Alerts": {
            "type": "object",
            "description": "Notification destinations (email addresses, Slack channels)"
        },
        "Enabled": {"type": "boolean", "description": "Whether the policy is active", "default": true}
    })
}

#[async_trait]
impl Service for MonitoringService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-alert-policy-create",
                "Create a new monitoring alert policy",
                json!({
                    "type": "object",
                    "properties": policy_properties(),
                    "required": ["Type", "Description", "Compare", "Value", "Window"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-alert-policy-get",
                "Get a monitoring alert policy by UUID",
                json!({
                    "type": "object",
                    "properties": {
                        "UUID": {"type": "string", "description": "Alert policy UUID"}
                    },
                    "required": ["UUID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-alert-policy-list",
                "List monitoring alert policies with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-alert-policy-update",
                "Update a monitoring alert policy",
                json!({
                    "type": "object",
                    "properties": {
                        "UUID": {"type": "string", "description": "Alert policy UUID"},
                        "Type": {"type": "string", "description": "Metric type (e.g., v1/insights/droplet/cpu)"},
                        "Description": {"type": "string", "description": "Policy description"},
                        "Compare": {"type": "string", "description": "Comparison operator", "enum": ["GreaterThan", "LessThan"]},
                        "Value": {"type": "number", "description": "Threshold value"},
                        "Window": {"type": "string", "description": "Evaluation window (5m, 10m, 30m, 1h)"},
                        "Entities": {
                            "type": "array",
                            "description": "Droplet IDs the policy applies to",
                            "items": {"type": "string"}
                        },
                        "Tags": {
                            "type": "array",
                            "description": "Tags whose droplets the policy applies to",
                            "items": {"type": "string"}
                        },
                        "Alerts": {
                            "type": "object",
                            "description": "Notification destinations (email addresses, Slack channels)"
                        },
                        "Enabled": {"type": "boolean", "description": "Whether the policy is active", "default": true}
                    },
                    "required": ["UUID", "Type", "Description", "Compare", "Value", "Window"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-alert-policy-delete",
                "Delete a monitoring alert policy",
                json!({
                    "type": "object",
                    "properties": {
                        "UUID": {"type": "string", "description": "UUID of the alert policy to delete"}
                    },
                    "required": ["UUID"]
                }),
            ),
        ]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-alert-policy-create" => self.create_policy(args).await,
            "digitalocean-alert-policy-get" => self.get_policy(args).await,
            "digitalocean-alert-policy-list" => self.list_policies(args).await,
            "digitalocean-alert-policy-update" => self.update_policy(args).await,
            "digitalocean-alert-policy-delete" => self.delete_policy(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }
}

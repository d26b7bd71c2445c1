/// Uptime check and uptime alert management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ToolCallResult, ToolDefinition};
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

const DEFAULT_UPTIME_PAGE_SIZE: u32 = 20;

pub struct UptimeService {
    client: Arc<DoClient>,
}

impl UptimeService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    fn check_body(args: &Arguments) -> Result<Value, ToolError> {
        let name = args.require_str("Name")?;
        let kind = args.require_str("Type")?;
        let target = args.require_str("Target")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert("type".to_string(), json!(kind));
        body.insert("target".to_string(), json!(target));
        let regions = args.opt_str_vec("Regions");
        if !regions.is_empty() {
            body.insert("regions".to_string(), json!(regions));
        }
        body.insert("enabled".to_string(), json!(args.bool_or("Enabled", true)));
        Ok(Value::Object(body))
    }

    async fn create_check(&self, args: &Arguments) -> Result<String, ToolError> {
        let body = Self::check_body(args)?;
        let check = self.client.post("uptime/checks", body).await?;
        render_json(&section(check, "check"))
    }

    async fn get_check(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let check = self.client.get(&format!("uptime/checks/{id}")).await?;
        render_json(&section(check, "check"))
    }

    async fn get_check_state(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let state = self
            .client
            .get(&format!("uptime/checks/{id}/state"))
            .await?;
        render_json(&section(state, "state"))
    }

    async fn list_checks(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_UPTIME_PAGE_SIZE);
        let checks = self.client.get_paged("uptime/checks", page).await?;
        render_json(&section(checks, "checks"))
    }

    async fn update_check(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?.to_string();
        let body = Self::check_body(args)?;
        let check = self
            .client
            .put(&format!("uptime/checks/{id}"), body)
            .await?;
        render_json(&section(check, "check"))
    }

    async fn delete_check(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client.delete(&format!("uptime/checks/{id}")).await?;
        Ok("Uptime check deleted successfully".to_string())
    }

    fn alert_body(args: &Arguments) -> Result<Value, ToolError> {
        let name = args.require_str("Name")?;
        let kind = args.require_str("Type")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert("type".to_string(), json!(kind));
        if let Some(threshold) = args.opt_i64("Threshold") {
            body.insert("threshold".to_string(), json!(threshold));
        }
        if let Some(comparison) = args.opt_str("Comparison") {
            body.insert("comparison".to_string(), json!(comparison));
        }
        if let Some(period) = args.opt_str("Period") {
            body.insert("period".to_string(), json!(period));
        }
        if let Some(notifications) = args.opt_value("Notifications") {
            body.insert("notifications".to_string(), notifications.clone());
        }
        Ok(Value::Object(body))
    }

    async fn create_alert(&self, args: &Arguments) -> Result<String, ToolError> {
        let check_id = args.require_str("CheckID")?.to_string();
        let body = Self::alert_body(args)?;
        let alert = self
            .client
            .post(&format!("uptime/checks/{check_id}/alerts"), body)
            .await?;
        render_json(&section(alert, "alert"))
    }

    async fn get_alert(&self, args: &Arguments) -> Result<String, ToolError> {
        let check_id = args.require_str("CheckID")?;
        let alert_id = args.require_str("AlertID")?;
        let alert = self
            .client
            .get(&format!("uptime/checks/{check_id}/alerts/{alert_id}"))
            .await?;
        render_json(&section(alert, "alert"))
    }

    async fn list_alerts(&self, args: &Arguments) -> Result<String, ToolError> {
        let check_id = args.require_str("CheckID")?;
        let page = args.page(DEFAULT_UPTIME_PAGE_SIZE);
        let alerts = self
            .client
            .get_paged(&format!("uptime/checks/{check_id}/alerts"), page)
            .await?;
        render_json(&section(alerts, "alerts"))
    }

    async fn update_alert(&self, args: &Arguments) -> Result<String, ToolError> {
        let check_id = args.require_str("CheckID")?.to_string();
        let alert_id = args.require_str("AlertID")?.to_string();
        let body = Self::alert_body(args)?;
        let alert = self
            .client
            .put(&format!("uptime/checks/{check_id}/alerts/{alert_id}"), body)
            .await?;
        render_json(&section(alert, "alert"))
    }

    async fn delete_alert(&self, args: &Arguments) -> Result<String, ToolError> {
        let check_id = args.require_str("CheckID")?;
        let alert_id = args.require_str("AlertID")?;
        self.client
            .delete(&format!("uptime/checks/{check_id}/alerts/{alert_id}"))
            .await?;
        Ok("Uptime alert deleted successfully".to_string())
    }
}

fn check_properties() -> Value {
    json!({
        "Name": {"type": "string", "description": "Check name"},
        "Type": {"type": "string", "description": "Check type: ping, http or https", "enum": ["ping", "http", "https"]},
        "Target": {"type": "string", "description": "Endpoint to monitor"},
        "Regions": {
            "type": "array",
            "description": "Regions to probe from (us_east, us_west, eu_west, se_asia)",
            "items": {"type": "string"}
        },
        "Enabled": {"type": "boolean", "description": "Whether the check runs", "default": true}
    })
}

fn alert_properties() -> Value {
    json!({
        "CheckID": {"type": "string", "description": "ID of the uptime check"},
        "Name": {"type": "string", "description": "Alert name"},
        "Type": {"type": "string", "description": "Alert type: latency, down, down_global or ssl_expiry", "enum": ["latency", "down", "down_global", "ssl_expiry"]},
        "Threshold": {"type": "number", "description": "Threshold that triggers the alert"},
        "Comparison": {"type": "string", "description": "Comparison operator: greater_than or less_than"},
        "Period": {"type": "string", "description": "Period the threshold must hold (e.g., 2m, 5m, 1h)"},
        "Notifications": {
            "type": "object",
            "description": "Notification destinations (email addresses, Slack channels)"
        }
    })
}

#[async_trait]
impl Service for UptimeService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-uptime-check-create",
                "Create a new uptime check",
                json!({
                    "type": "object",
                    "properties": check_properties(),
                    "required": ["Name", "Type", "Target"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-check-get",
                "Get information about an uptime check by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Uptime check ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-check-get-state",
                "Get the state of an uptime check",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Uptime check ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-check-list",
                "List uptime checks with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-check-update",
                "Update an uptime check",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Uptime check ID"},
                        "Name": {"type": "string", "description": "Check name"},
                        "Type": {"type": "string", "description": "Check type: ping, http or https", "enum": ["ping", "http", "https"]},
                        "Target": {"type": "string", "description": "Endpoint to monitor"},
                        "Regions": {
                            "type": "array",
                            "description": "Regions to probe from (us_east, us_west, eu_west, se_asia)",
                            "items": {"type": "string"}
                        },
                        "Enabled": {"type": "boolean", "description": "Whether the check runs", "default": true}
                    },
                    "required": ["ID", "Name", "Type", "Target"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-check-delete",
                "Delete an uptime check",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "ID of the uptime check to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-alert-create",
                "Create an alert on an uptime check",
                json!({
                    "type": "object",
                    "properties": alert_properties(),
                    "required": ["CheckID", "Name", "Type"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-alert-get",
                "Get an uptime alert by check ID and alert ID",
                json!({
                    "type": "object",
                    "properties": {
                        "CheckID": {"type": "string", "description": "Uptime check ID"},
                        "AlertID": {"type": "string", "description": "Alert ID"}
                    },
                    "required": ["CheckID", "AlertID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-alert-list",
                "List alerts of an uptime check",
                json!({
                    "type": "object",
                    "properties": {
                        "CheckID": {"type": "string", "description": "Uptime check ID"},
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    },
                    "required": ["CheckID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-alert-update",
                "Update an uptime alert",
                json!({
                    "type": "object",
                    "properties": {
                        "CheckID": {"type": "string", "description": "Uptime check ID"},
                        "AlertID": {"type": "string", "description": "Alert ID"},
                        "Name": {"type": "string", "description": "Alert name"},
                        "Type": {"type": "string", "description": "Alert type: latency, down, down_global or ssl_expiry", "enum": ["latency", "down", "down_global", "ssl_expiry"]},
                        "Threshold": {"type": "number", "description": "Threshold that triggers the alert"},
                        "Comparison": {"type": "string", "description": "Comparison operator: greater_than or less_than"},
                        "Period": {"type": "string", "description": "Period the threshold must hold (e.g., 2m, 5m, 1h)"},
                        "Notifications": {
                            "type": "object",
                            "description": "Notification destinations (email addresses, Slack channels)"
                        }
                    },
                    "required": ["CheckID", "AlertID", "Name", "Type"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-uptime-alert-delete",
                "Delete an uptime alert",
                json!({
                    "type": "object",
                    "properties": {
                        "CheckID": {"type": "string", "description": "Uptime check ID"},
                        "AlertID": {"type": "string", "description": "ID of the alert to delete"}
                    },
                    "required": ["CheckID", "AlertID"]
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
            "digitalocean-uptime-check-create" => self.create_check(args).await,
            "digitalocean-uptime-check-get" => self.get_check(args).await,
            "digitalocean-uptime-check-get-state" => self.get_check_state(args).await,
            "digitalocean-uptime-check-list" => self.list_checks(args).await,
            "digitalocean-uptime-check-update" => self.update_check(args).await,
            "digitalocean-uptime-check-delete" => self.delete_check(args).await,
            "digitalocean-uptime-alert-create" => self.create_alert(args).await,
            "digitalocean-uptime-alert-get" => self.get_alert(args).await,
            "digitalocean-uptime-alert-list" => self.list_alerts(args).await,
            "digitalocean-uptime-alert-update" => self.update_alert(args).await,
            "digitalocean-uptime-alert-delete" => self.delete_alert(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }
}

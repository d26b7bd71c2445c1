/// Account information, action log, balance and billing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{section, DoClient, Page};
use crate::mcp::protocol::{
    ResourceInfo, ResourceTemplateInfo, ToolCallResult, ToolDefinition,
};
use crate::services::uri::extract_numeric_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const ACTION_URI: &str = "actions://";
pub const BILLING_URI: &str = "billing://";
pub const INVOICE_URI: &str = "invoice://";

const DEFAULT_ACCOUNT_PAGE_SIZE: u32 = 30;

pub struct AccountService {
    client: Arc<DoClient>,
}

impl AccountService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn get_account(&self) -> Result<String, ToolError> {
        let account = self.client.get("account").await?;
        render_json(&section(account, "account"))
    }

    async fn get_action(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_i64("ID")?;
        let action = self.client.get(&format!("actions/{id}")).await?;
        render_json(&section(action, "action"))
    }

    async fn list_actions(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_ACCOUNT_PAGE_SIZE);
        let actions = self.client.get_paged("actions", page).await?;
        render_json(&section(actions, "actions"))
    }

    async fn get_balance(&self) -> Result<String, ToolError> {
        // The balance endpoint has no envelope
        let balance = self.client.get("customers/my/balance").await?;
        render_json(&balance)
    }

    async fn list_billing_history(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_ACCOUNT_PAGE_SIZE);
        let history = self
            .client
            .get_paged("customers/my/billing_history", page)
            .await?;
        render_json(&section(history, "billing_history"))
    }

    async fn list_invoices(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_ACCOUNT_PAGE_SIZE);
        let invoices = self.client.get_paged("customers/my/invoices", page).await?;
        render_json(&section(invoices, "invoices"))
    }

    async fn read_action(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_numeric_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid action URI: {uri}")))?;
        let action = self.client.get(&format!("actions/{id}")).await?;
        render_json(&section(action, "action"))
    }

    /// `billing://{n}` and `invoice://{n}` read the most recent `n` entries.
    fn last_count(uri: &str) -> Result<u32, ToolError> {
        let count = extract_numeric_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid URI: {uri}")))?;
        match u32::try_from(count) {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(ToolError::InvalidArgs(format!(
                "count must be positive in URI: {uri}"
            ))),
        }
    }

    async fn read_billing_history(&self, uri: &str) -> Result<String, ToolError> {
        let count = Self::last_count(uri)?;
        let history = self
            .client
            .get_paged("customers/my/billing_history", Page::first(count))
            .await?;
        render_json(&section(history, "billing_history"))
    }

    async fn read_invoices(&self, uri: &str) -> Result<String, ToolError> {
        let count = Self::last_count(uri)?;
        let invoices = self
            .client
            .get_paged("customers/my/invoices", Page::first(count))
            .await?;
        render_json(&section(invoices, "invoices"))
    }
}

#[async_trait]
impl Service for AccountService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-account-get",
                "Get information about the current account",
                json!({"type": "object", "properties": {}}),
            ),
            ToolDefinition::new(
                "digitalocean-action-get",
                "Get an account action by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "number", "description": "Action ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-action-list",
                "List account actions with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 30}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-balance-get",
                "Get the current account balance",
                json!({"type": "object", "properties": {}}),
            ),
            ToolDefinition::new(
                "digitalocean-billing-history-list",
                "List billing history entries with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 30}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-invoice-list",
                "List invoices with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 30}
                    }
                }),
            ),
        ]
    }

    fn resources(&self) -> Vec<ResourceInfo> {
        vec![
            ResourceInfo::json(
                "account://current",
                "Account",
                "Returns information about the current account",
            ),
            ResourceInfo::json(
                "balance://current",
                "Balance",
                "Returns the current account balance",
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![
            ResourceTemplateInfo::json(
                "actions://{id}",
                "Action",
                "Returns information about an account action",
            ),
            ResourceTemplateInfo::json(
                "billing://{last}",
                "Billing History",
                "Returns the most recent billing history entries",
            ),
            ResourceTemplateInfo::json(
                "invoice://{last}",
                "Invoices",
                "Returns the most recent invoices",
            ),
        ]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-account-get" => self.get_account().await,
            "digitalocean-action-get" => self.get_action(args).await,
            "digitalocean-action-list" => self.list_actions(args).await,
            "digitalocean-balance-get" => self.get_balance().await,
            "digitalocean-billing-history-list" => self.list_billing_history(args).await,
            "digitalocean-invoice-list" => self.list_invoices(args).await,
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if uri == "account://current" {
            Some(self.get_account().await)
        } else if uri == "balance://current" {
            Some(self.get_balance().await)
        } else if uri.starts_with(ACTION_URI) {
            Some(self.read_action(uri).await)
        } else if uri.starts_with(BILLING_URI) {
            Some(self.read_billing_history(uri).await)
        } else if uri.starts_with(INVOICE_URI) {
            Some(self.read_invoices(uri).await)
        } else {
            None
        }
    }
}

/// Service modules wrapping the DigitalOcean API surface.
///
/// Each module owns one service area (droplets, domains, firewalls, ...) and
/// follows the same shape: read arguments from the untyped map, issue one
/// API call, pretty-print the response (or return a canned success string
/// for bodyless operations), and translate failures into a uniform error
/// result.

pub mod account;
pub mod cdn;
pub mod certificates;
pub mod domains;
pub mod droplets;
pub mod firewalls;
pub mod images;
pub mod monitoring;
pub mod partner_attachments;
pub mod regions;
pub mod reserved_ips;
pub mod sizes;
pub mod spaces_keys;
pub mod ssh_keys;
pub mod uptime;
pub mod uri;
pub mod vpcs;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::{ApiError, Page};
use crate::mcp::protocol::{ResourceInfo, ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::ServerError;

/// Failure of a single tool or resource handler.
///
/// The three kinds map to the three uniform outcomes: `InvalidArgs` becomes
/// a user-visible error result without an API call, `Api` becomes an error
/// result with the original message, and `Json` propagates to the protocol
/// layer as a server error.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    InvalidArgs(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One service area: a set of tools plus the resources it serves.
#[async_trait]
pub trait Service: Send + Sync {
    fn tools(&self) -> Vec<ToolDefinition>;

    fn resources(&self) -> Vec<ResourceInfo> {
        Vec::new()
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        Vec::new()
    }

    /// Run a tool by name. `None` means the tool belongs to another service.
    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>>;

    /// Read a resource by URI. `None` means the scheme belongs to another
    /// service.
    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        let _ = uri;
        None
    }
}

/// Map a handler outcome onto the wire: argument and API failures become
/// error tool results, serialization failures propagate.
pub(crate) fn into_tool_result(
    outcome: Result<String, ToolError>,
) -> Result<ToolCallResult, ServerError> {
    match outcome {
        Ok(text) => Ok(ToolCallResult::text(text)),
        Err(ToolError::InvalidArgs(message)) => Ok(ToolCallResult::error(message)),
        Err(ToolError::Api(err)) => Ok(ToolCallResult::error(format!("api error: {err}"))),
        Err(ToolError::Json(err)) => Err(ServerError::Json(err)),
    }
}

pub(crate) fn render_json(value: &Value) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// The untyped argument map of a tool call, read positionally with type
/// coercion and defaults.
#[derive(Debug, Default)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn opt_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &str) -> Result<&str, ToolError> {
        match self.opt_str(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ToolError::InvalidArgs(format!("{key} is required"))),
        }
    }

    /// Numbers arrive as JSON numbers; integral floats are accepted the way
    /// the protocol delivers them.
    pub fn opt_i64(&self, key: &str) -> Option<i64> {
        let value = self.get(key)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|float| float as i64))
    }

    pub fn require_i64(&self, key: &str) -> Result<i64, ToolError> {
        self.opt_i64(key)
            .ok_or_else(|| ToolError::InvalidArgs(format!("{key} is required")))
    }

    pub fn opt_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn opt_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.opt_bool(key).unwrap_or(default)
    }

    pub fn require_bool(&self, key: &str) -> Result<bool, ToolError> {
        self.opt_bool(key)
            .ok_or_else(|| ToolError::InvalidArgs(format!("{key} is required")))
    }

    pub fn opt_str_vec(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn require_str_vec(&self, key: &str) -> Result<Vec<String>, ToolError> {
        match self.get(key).and_then(Value::as_array) {
            Some(items) => Ok(items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()),
            None => Err(ToolError::InvalidArgs(format!("{key} is required"))),
        }
    }

    pub fn opt_i64_vec(&self, key: &str) -> Vec<i64> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        item.as_i64()
                            .or_else(|| item.as_f64().map(|float| float as i64))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn require_i64_vec(&self, key: &str) -> Result<Vec<i64>, ToolError> {
        match self.get(key).and_then(Value::as_array) {
            Some(items) => Ok(items
                .iter()
                .filter_map(|item| {
                    item.as_i64()
                        .or_else(|| item.as_f64().map(|float| float as i64))
                })
                .collect()),
            None => Err(ToolError::InvalidArgs(format!("{key} is required"))),
        }
    }

    /// Raw value passthrough for nested structures (firewall rules, alert
    /// notification settings).
    pub fn opt_value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    /// `Page`/`PerPage` with per-area defaults. Zero and negative values
    /// fall back to the defaults, as the original handlers do.
    pub fn page(&self, default_per_page: u32) -> Page {
        let page = match self.opt_i64("Page") {
            Some(value) if value > 0 => value as u32,
            _ => 1,
        };
        let per_page = match self.opt_i64("PerPage") {
            Some(value) if value > 0 => value as u32,
            _ => default_per_page,
        };
        Page { page, per_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => Arguments::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn required_string_rejects_missing_empty_and_mistyped() {
        let arguments = args(json!({"Name": "web-1", "Empty": "", "Number": 7}));
        assert_eq!(arguments.require_str("Name").unwrap(), "web-1");
        assert!(arguments.require_str("Empty").is_err());
        assert!(arguments.require_str("Number").is_err());
        assert!(arguments.require_str("Missing").is_err());
    }

    #[test]
    fn numbers_accept_integral_floats() {
        let arguments = args(json!({"ID": 12345.0, "Exact": 7}));
        assert_eq!(arguments.require_i64("ID").unwrap(), 12345);
        assert_eq!(arguments.require_i64("Exact").unwrap(), 7);
        assert!(arguments.require_i64("Missing").is_err());
    }

    #[test]
    fn page_defaults_and_rejects_non_positive() {
        let arguments = args(json!({"Page": 0, "PerPage": -3}));
        assert_eq!(arguments.page(20), Page { page: 1, per_page: 20 });

        let arguments = args(json!({"Page": 3, "PerPage": 10}));
        assert_eq!(arguments.page(50), Page { page: 3, per_page: 10 });

        let arguments = args(json!({}));
        assert_eq!(arguments.page(30), Page { page: 1, per_page: 30 });
    }

    #[test]
    fn vectors_skip_mistyped_items() {
        let arguments = args(json!({"Tags": ["a", 1, "b"], "IDs": [1, "x", 2.0]}));
        assert_eq!(arguments.opt_str_vec("Tags"), vec!["a", "b"]);
        assert_eq!(arguments.opt_i64_vec("IDs"), vec![1, 2]);
        assert!(arguments.require_str_vec("Missing").is_err());
        assert!(arguments.opt_str_vec("Missing").is_empty());
    }

    #[test]
    fn api_errors_become_error_results_and_json_errors_propagate() {
        let outcome = into_tool_result(Err(ToolError::Api(crate::api::ApiError::Api {
            status: 404,
            message: "droplet not found".into(),
        })));
        let result = outcome.unwrap();
        assert!(result.is_error);
        assert!(result.content[0].text.contains("droplet not found"));

        let invalid = into_tool_result(Err(ToolError::InvalidArgs("ID is required".into())));
        assert!(invalid.unwrap().is_error);

        let json_err = serde_json::from_str::<Value>("not json").unwrap_err();
        assert!(into_tool_result(Err(ToolError::Json(json_err))).is_err());
    }
}

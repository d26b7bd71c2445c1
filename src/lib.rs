/// Public library interface for the DigitalOcean MCP server.
///
/// The server exposes the DigitalOcean API as MCP tools and resources over
/// stdio. `DigitalOceanServer` owns the API client and the service registry;
/// `run` hands both to the protocol loop.

use std::sync::Arc;

use thiserror::Error;

pub mod api;
pub mod mcp;
pub mod registry;
pub mod services;

pub use api::{ApiError, DoClient};
pub use registry::{Registry, SUPPORTED_SERVICES};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("API client error: {0}")]
    Client(#[from] api::ApiError),

    #[error("unsupported service: {requested}, supported services are: {supported}")]
    UnknownService { requested: String, supported: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// DigitalOcean MCP server: one API client shared by every registered
/// service module.
pub struct DigitalOceanServer {
    registry: Registry,
}

impl DigitalOceanServer {
    /// Build the server from an API token and a list of service activation
    /// names (empty list = all services).
    pub fn new(token: &str, services: &[String]) -> Result<Self, ServerError> {
        let client = Arc::new(DoClient::new(token)?);
        Self::with_client(client, services)
    }

    pub fn with_client(client: Arc<DoClient>, services: &[String]) -> Result<Self, ServerError> {
        let registry = Registry::new(client, services)?;
        Ok(Self { registry })
    }

    /// Run the MCP server over stdin/stdout until the client disconnects.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "serving {} tools and {} resource templates",
            self.registry.tools().len(),
            self.registry.resource_templates().len()
        );

        let mut server = mcp::McpServer::new(self.registry);
        server.run().await
    }

    /// The underlying registry (useful for tests)
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// TLS certificate management.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::api::{section, DoClient};
use crate::mcp::protocol::{ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::uri::extract_string_id;
use crate::services::{into_tool_result, render_json, Arguments, Service, ToolError};
use crate::ServerError;

pub const CERTIFICATE_URI: &str = "certificates://";

const DEFAULT_CERTIFICATES_PAGE_SIZE: u32 = 20;

pub struct CertificateService {
    client: Arc<DoClient>,
}

impl CertificateService {
    pub fn new(client: Arc<DoClient>) -> Self {
        Self { client }
    }

    async fn get_certificate(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        let certificate = self.client.get(&format!("certificates/{id}")).await?;
        render_json(&section(certificate, "certificate"))
    }

    async fn list_certificates(&self, args: &Arguments) -> Result<String, ToolError> {
        let page = args.page(DEFAULT_CERTIFICATES_PAGE_SIZE);
        let certificates = self.client.get_paged("certificates", page).await?;
        render_json(&section(certificates, "certificates"))
    }

    async fn delete_certificate(&self, args: &Arguments) -> Result<String, ToolError> {
        let id = args.require_str("ID")?;
        self.client.delete(&format!("certificates/{id}")).await?;
        Ok("Certificate deleted successfully".to_string())
    }

    async fn create_custom(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let private_key = args.require_str("PrivateKey")?;
        let leaf = args.require_str("LeafCertificate")?;
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert("type".to_string(), json!("custom"));
        body.insert("private_key".to_string(), json!(private_key));
        body.insert("leaf_certificate".to_string(), json!(leaf));
        if let Some(chain) = args.opt_str("CertificateChain") {
            body.insert("certificate_chain".to_string(), json!(chain));
        }
        let certificate = self.client.post("certificates", Value::Object(body)).await?;
        render_json(&section(certificate, "certificate"))
    }

    async fn create_lets_encrypt(&self, args: &Arguments) -> Result<String, ToolError> {
        let name = args.require_str("Name")?;
        let dns_names = args.require_str_vec("DnsNames")?;
        if dns_names.is_empty() {
            return Err(ToolError::InvalidArgs(
                "DnsNames must contain at least one domain".to_string(),
            ));
        }
        let body = json!({
            "name": name,
            "type": "lets_encrypt",
            "dns_names": dns_names,
        });
        let certificate = self.client.post("certificates", body).await?;
        render_json(&section(certificate, "certificate"))
    }

    async fn read_certificate(&self, uri: &str) -> Result<String, ToolError> {
        let id = extract_string_id(uri)
            .map_err(|_| ToolError::InvalidArgs(format!("invalid certificate URI: {uri}")))?;
        let certificate = self.client.get(&format!("certificates/{id}")).await?;
        render_json(&section(certificate, "certificate"))
    }
}

#[async_trait]
impl Service for CertificateService {
    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new(
                "digitalocean-certificate-get",
                "Get information about a certificate by ID",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "Certificate ID"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-certificate-list",
                "List certificates with pagination",
                json!({
                    "type": "object",
                    "properties": {
                        "Page": {"type": "number", "description": "Page number", "default": 1},
                        "PerPage": {"type": "number", "description": "Items per page", "default": 20}
                    }
                }),
            ),
            ToolDefinition::new(
                "digitalocean-certificate-delete",
                "Delete a certificate",
                json!({
                    "type": "object",
                    "properties": {
                        "ID": {"type": "string", "description": "ID of the certificate to delete"}
                    },
                    "required": ["ID"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-certificate-create-custom",
                "Create a certificate from an existing key and certificate chain",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Certificate name"},
                        "PrivateKey": {"type": "string", "description": "PEM-encoded private key"},
                        "LeafCertificate": {"type": "string", "description": "PEM-encoded leaf certificate"},
                        "CertificateChain": {"type": "string", "description": "PEM-encoded certificate chain"}
                    },
                    "required": ["Name", "PrivateKey", "LeafCertificate"]
                }),
            ),
            ToolDefinition::new(
                "digitalocean-certificate-create-lets-encrypt",
                "Create a Let's Encrypt certificate",
                json!({
                    "type": "object",
                    "properties": {
                        "Name": {"type": "string", "description": "Certificate name"},
                        "DnsNames": {
                            "type": "array",
                            "description": "Domains covered by the certificate",
                            "items": {"type": "string"}
                        }
                    },
                    "required": ["Name", "DnsNames"]
                }),
            ),
        ]
    }

    fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        vec![ResourceTemplateInfo::json(
            "certificates://{id}",
            "Certificate",
            "Returns certificate information",
        )]
    }

    async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Option<Result<ToolCallResult, ServerError>> {
        let outcome = match name {
            "digitalocean-certificate-get" => self.get_certificate(args).await,
            "digitalocean-certificate-list" => self.list_certificates(args).await,
            "digitalocean-certificate-delete" => self.delete_certificate(args).await,
            "digitalocean-certificate-create-custom" => self.create_custom(args).await,
            "digitalocean-certificate-create-lets-encrypt" => {
                self.create_lets_encrypt(args).await
            }
            _ => return None,
        };
        Some(into_tool_result(outcome))
    }

    async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        if !uri.starts_with(CERTIFICATE_URI) {
            return None;
        }
        Some(self.read_certificate(uri).await)
    }
}

/// Wires service modules into the server.
///
/// Activation names group related service modules the way the upstream API
/// documentation does; an empty activation list loads everything. Region
/// tools are registered regardless of the selection because every other
/// service refers to region slugs.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::DoClient;
use crate::mcp::protocol::{ResourceInfo, ResourceTemplateInfo, ToolCallResult, ToolDefinition};
use crate::services::{
    account::AccountService, cdn::CdnService, certificates::CertificateService,
    domains::DomainService, droplets::DropletService, firewalls::FirewallService,
    images::ImageService, monitoring::MonitoringService,
    partner_attachments::PartnerAttachmentService, regions::RegionService,
    reserved_ips::ReservedIpService, sizes::SizeService, spaces_keys::SpacesKeyService,
    ssh_keys::SshKeyService, uptime::UptimeService, vpcs::VpcService,
};
use crate::services::{Arguments, Service, ToolError};
use crate::ServerError;

/// Activation names accepted by `--services`
pub const SUPPORTED_SERVICES: &[&str] = &["droplets", "networking", "accounts", "insights", "spaces"];

pub struct Registry {
    services: Vec<Box<dyn Service>>,
}

impl Registry {
    pub fn new(client: Arc<DoClient>, activate: &[String]) -> Result<Self, ServerError> {
        let names: Vec<String> = if activate.is_empty() {
            warn!("no services specified, loading all supported services");
            SUPPORTED_SERVICES.iter().map(|s| s.to_string()).collect()
        } else {
            activate.to_vec()
        };

        let mut services: Vec<Box<dyn Service>> = Vec::new();
        for name in &names {
            debug!("registering tools and resources for service: {}", name);
            match name.as_str() {
                "droplets" => {
                    services.push(Box::new(DropletService::new(client.clone())));
                    services.push(Box::new(ImageService::new(client.clone())));
                    services.push(Box::new(SizeService::new(client.clone())));
                }
                "networking" => {
                    services.push(Box::new(DomainService::new(client.clone())));
                    services.push(Box::new(FirewallService::new(client.clone())));
                    services.push(Box::new(CertificateService::new(client.clone())));
                    services.push(Box::new(ReservedIpService::new(client.clone())));
                    services.push(Box::new(VpcService::new(client.clone())));
                    services.push(Box::new(CdnService::new(client.clone())));
                    services.push(Box::new(PartnerAttachmentService::new(client.clone())));
                }
                "accounts" => {
                    services.push(Box::new(AccountService::new(client.clone())));
                    services.push(Box::new(SshKeyService::new(client.clone())));
                }
                "insights" => {
                    services.push(Box::new(UptimeService::new(client.clone())));
                    services.push(Box::new(MonitoringService::new(client.clone())));
                }
                "spaces" => {
                    services.push(Box::new(SpacesKeyService::new(client.clone())));
                }
                other => {
                    return Err(ServerError::UnknownService {
                        requested: other.to_string(),
                        supported: SUPPORTED_SERVICES.join(","),
                    });
                }
            }
        }

        // Region data is referenced by every other service
        services.push(Box::new(RegionService::new(client)));

        Ok(Self { services })
    }

    pub fn tools(&self) -> Vec<ToolDefinition> {
        self.services
            .iter()
            .flat_map(|service| service.tools())
            .collect()
    }

    pub fn resources(&self) -> Vec<ResourceInfo> {
        self.services
            .iter()
            .flat_map(|service| service.resources())
            .collect()
    }

    pub fn resource_templates(&self) -> Vec<ResourceTemplateInfo> {
        self.services
            .iter()
            .flat_map(|service| service.resource_templates())
            .collect()
    }

    pub async fn call_tool(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Result<ToolCallResult, ServerError> {
        for service in &self.services {
            if let Some(result) = service.call_tool(name, args).await {
                return result;
            }
        }
        Ok(ToolCallResult::error(format!("Unknown tool: {name}")))
    }

    pub async fn read_resource(&self, uri: &str) -> Option<Result<String, ToolError>> {
        for service in &self.services {
            if let Some(result) = service.read_resource(uri).await {
                return Some(result);
            }
        }
        None
    }
}

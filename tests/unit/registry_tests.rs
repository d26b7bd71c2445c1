use std::collections::HashSet;
use std::sync::Arc;

use mcp_digitalocean::{DoClient, Registry, ServerError, SUPPORTED_SERVICES};

fn client() -> Arc<DoClient> {
    Arc::new(DoClient::new("test-token").unwrap())
}

fn registry(services: &[&str]) -> Registry {
    let names: Vec<String> = services.iter().map(|s| s.to_string()).collect();
    Registry::new(client(), &names).unwrap()
}

#[test]
fn unknown_service_is_rejected() {
    let err = Registry::new(client(), &["droplets".to_string(), "kubernetes".to_string()])
        .err()
        .unwrap();
    match err {
        ServerError::UnknownService {
            requested,
            supported,
        } => {
            assert_eq!(requested, "kubernetes");
            for name in SUPPORTED_SERVICES {
                assert!(supported.contains(name));
            }
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_activation_loads_all_services() {
    let registry = registry(&[]);
    let names: Vec<String> = registry.tools().into_iter().map(|t| t.name).collect();

    assert!(names.contains(&"digitalocean-droplet-create".to_string()));
    assert!(names.contains(&"digitalocean-domain-list".to_string()));
    assert!(names.contains(&"digitalocean-account-get".to_string()));
    assert!(names.contains(&"digitalocean-uptime-check-list".to_string()));
    assert!(names.contains(&"digitalocean-spaces-key-create".to_string()));
    assert!(names.contains(&"digitalocean-region-list".to_string()));
}

#[test]
fn activation_scopes_registered_tools() {
    let registry = registry(&["droplets"]);
    let names: Vec<String> = registry.tools().into_iter().map(|t| t.name).collect();

    assert!(names.contains(&"digitalocean-droplet-get".to_string()));
    assert!(names.contains(&"digitalocean-image-list".to_string()));
    assert!(names.contains(&"digitalocean-size-list".to_string()));
    assert!(!names.contains(&"digitalocean-domain-list".to_string()));
    assert!(!names.contains(&"digitalocean-firewall-create".to_string()));
}

#[test]
fn regions_are_always_registered() {
    for selection in [&["accounts"][..], &["spaces"][..], &["insights"][..]] {
        let registry = registry(selection);
        let names: Vec<String> = registry.tools().into_iter().map(|t| t.name).collect();
        assert!(
            names.contains(&"digitalocean-region-list".to_string()),
            "selection {selection:?} should include region tools"
        );
    }
}

#[test]
fn tool_names_are_unique() {
    let registry = registry(&[]);
    let names: Vec<String> = registry.tools().into_iter().map(|t| t.name).collect();
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len());

    for name in &names {
        assert!(name.starts_with("digitalocean-"), "bad tool name: {name}");
    }
}

#[test]
fn partner_attachment_bgp_tool_uses_config_name() {
    let registry = registry(&["networking"]);
    let names: Vec<String> = registry.tools().into_iter().map(|t| t.name).collect();
    assert!(names.contains(&"digitalocean-partner-attachment-get-bgp-config".to_string()));
    assert!(names.contains(&"digitalocean-partner-attachment-get-service-key".to_string()));
}

#[test]
fn networking_activation_advertises_its_resources() {
    let registry = registry(&["networking"]);

    let templates: Vec<String> = registry
        .resource_templates()
        .into_iter()
        .map(|t| t.uri_template)
        .collect();
    assert!(templates.contains(&"domains://{name}".to_string()));
    assert!(templates.contains(&"firewalls://{id}".to_string()));
    assert!(templates.contains(&"reserved_ipv4://{ip}".to_string()));
    assert!(templates.contains(&"reserved_ipv6://{ip}".to_string()));
    assert!(templates.contains(&"vpc_peering://{id}".to_string()));
    assert!(!templates.contains(&"droplets://{id}".to_string()));
}

#[test]
fn droplets_activation_advertises_fixed_resources() {
    let registry = registry(&["droplets"]);

    let resources: Vec<String> = registry.resources().into_iter().map(|r| r.uri).collect();
    assert!(resources.contains(&"images://distribution".to_string()));
    assert!(resources.contains(&"sizes://all".to_string()));
    assert!(resources.contains(&"regions://all".to_string()));

    let templates: Vec<String> = registry
        .resource_templates()
        .into_iter()
        .map(|t| t.uri_template)
        .collect();
    assert!(templates.contains(&"droplets://{id}".to_string()));
    assert!(templates.contains(&"droplets://{id}/actions/{action_id}".to_string()));
}

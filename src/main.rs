/// Main entry point for the DigitalOcean MCP server.
///
/// Sets up stderr logging, resolves the API token, and starts the stdio
/// protocol loop. stdout is reserved for JSON-RPC traffic.

use clap::Parser;
use tracing::{error, info};

use mcp_digitalocean::DigitalOceanServer;

/// Command line arguments for the DigitalOcean MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated list of services to activate (e.g. droplets,networking).
    /// All services are activated when omitted.
    #[arg(long, value_delimiter = ',')]
    services: Vec<String>,

    /// DigitalOcean API token. Falls back to the DO_TOKEN environment variable.
    #[arg(long)]
    api_token: Option<String>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs must go to stderr; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(format!("mcp_digitalocean={}", args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let token = match args.api_token.or_else(|| std::env::var("DO_TOKEN").ok()) {
        Some(token) if !token.trim().is_empty() => token,
        _ => {
            error!(
                "DigitalOcean API token not provided. \
                 Use --api-token or set the DO_TOKEN environment variable"
            );
            std::process::exit(1);
        }
    };

    info!("starting DigitalOcean MCP server");

    let server = DigitalOceanServer::new(&token, &args.services)?;
    server.run().await?;

    info!("DigitalOcean MCP server shutdown complete");
    Ok(())
}

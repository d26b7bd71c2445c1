/// MCP protocol layer: JSON-RPC message types and the stdio server loop.

pub mod protocol;
pub mod server;

pub use server::McpServer;

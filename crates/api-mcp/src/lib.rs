//! MCP API Layer
//!
//! Serves the operation catalog as MCP tools over newline-delimited
//! JSON-RPC 2.0 on stdin/stdout, with `rmcp` handling the protocol.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::McpHandler;
pub use server::McpServer;

//! Wire Types
//!
//! MCP payloads come from `rmcp::model`. What is left here is the plain
//! JSON-RPC envelope the stdio gate writes when a line never reaches the
//! MCP service (its id may be `null`, which MCP request ids cannot be).

use jsonrpsee_types::ErrorObjectOwned;
use serde::Serialize;
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revision assumed when an `initialize` request does not name one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub const SERVER_NAME: &str = "atxp";

pub const SERVER_TITLE: &str = "ATXP";

pub const SERVER_INSTRUCTIONS: &str =
    "Each tool runs one `atxp` CLI command and returns its output as text.";

/// Outgoing JSON-RPC error response written by the gate
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: ErrorObjectOwned,
}

impl RpcResponse {
    pub fn failure(id: Value, error: ErrorObjectOwned) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }
}

//! RPC Error Types
//!
//! Maps application errors to MCP error data, and builds the JSON-RPC error
//! objects the stdio gate answers with itself.

use atxp_mcp_core::error::AppError;
use jsonrpsee_types::ErrorObjectOwned;
use rmcp::ErrorData as McpError;

/// Standard JSON-RPC 2.0 error codes
pub mod code {
    pub use jsonrpsee_types::error::{
        INTERNAL_ERROR_CODE as INTERNAL_ERROR, INVALID_PARAMS_CODE as INVALID_PARAMS,
        INVALID_REQUEST_CODE as INVALID_REQUEST, PARSE_ERROR_CODE as PARSE_ERROR,
    };
}

/// Convert AppError to the error returned from a tool call
pub fn to_mcp_error(err: AppError) -> McpError {
    match err {
        // Validation messages go to the client as-is
        AppError::Domain(e) => McpError::invalid_params(e.to_string(), None),
        AppError::UnknownOperation(_) => McpError::invalid_params(err.to_string(), None),
    }
}

pub fn parse_error(detail: impl std::fmt::Display) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::PARSE_ERROR,
        format!("Parse error: {}", detail),
        None::<()>,
    )
}

pub fn invalid_request(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code::INVALID_REQUEST, msg.into(), None::<()>)
}

pub fn invalid_params(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code::INVALID_PARAMS, msg.into(), None::<()>)
}

pub fn internal_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg.into(), None::<()>)
}

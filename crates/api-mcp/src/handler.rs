//! MCP Method Handlers
//!
//! `rmcp::ServerHandler` backed by the operation catalog: `tools/list` serves
//! every descriptor and `tools/call` goes through the dispatcher.

use crate::error::to_mcp_error;
use crate::types::{SERVER_INSTRUCTIONS, SERVER_NAME, SERVER_TITLE};
use atxp_mcp_core::application::Dispatcher;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData as McpError, Implementation,
    InitializeRequestParams, InitializeResult, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// MCP Handler with injected dependencies
#[derive(Clone)]
pub struct McpHandler {
    dispatcher: Arc<Dispatcher>,
}

impl McpHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Every catalog entry as an MCP tool, in registration order
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .catalog()
            .iter()
            .map(|op| {
                let schema = match op.input_schema() {
                    Value::Object(schema) => schema,
                    _ => JsonObject::new(),
                };
                Tool::new(op.name, op.description, Arc::new(schema))
            })
            .collect()
    }

    /// Run one tool.
    ///
    /// The dispatch runs on its own task so a panic inside it becomes an
    /// internal error instead of ending the session.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<CallToolResult, McpError> {
        let dispatcher = self.dispatcher.clone();
        let tool = name.to_string();

        let task = tokio::spawn(async move { dispatcher.dispatch(&tool, &arguments).await });

        match task.await {
            Ok(Ok(text)) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Ok(Err(e)) => Err(to_mcp_error(e)),
            Err(join_err) if join_err.is_panic() => {
                let panic_msg = panic_message(join_err.into_panic());
                error!(tool = %name, panic_msg = %panic_msg, "Tool call panicked");
                Err(McpError::internal_error(
                    format!("Tool {} failed unexpectedly", name),
                    None,
                ))
            }
            Err(join_err) => Err(McpError::internal_error(join_err.to_string(), None)),
        }
    }

    /// Server info answering `initialize`: the client's protocol revision
    /// when it is older than ours, ours otherwise
    pub fn negotiate(&self, requested: ProtocolVersion) -> InitializeResult {
        let mut info = self.get_info();
        if requested < info.protocol_version {
            info.protocol_version = requested;
        }
        info
    }
}

impl ServerHandler for McpHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: atxp_mcp_core::VERSION.to_string(),
                title: Some(SERVER_TITLE.to_string()),
                ..Default::default()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }

    fn initialize(
        &self,
        request: InitializeRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<InitializeResult, McpError>> + Send + '_ {
        info!(
            client = %request.client_info.name,
            client_version = %request.client_info.version,
            protocol_version = %request.protocol_version,
            "MCP client connected"
        );
        let result = self.negotiate(request.protocol_version.clone());
        if context.peer.peer_info().is_none() {
            context.peer.set_peer_info(request);
        }
        std::future::ready(Ok(result))
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        async move { self.call(&request.name, arguments).await }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

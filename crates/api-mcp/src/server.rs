//! MCP stdio Server
//!
//! Reads one JSON-RPC message per line and writes one message per line.
//! Each line is checked here before it reaches the rmcp service: lines that
//! are not well-formed JSON-RPC are answered directly, so bad input never
//! ends the session. Requests are handled strictly in order; the next line is
//! not read until the current response has been flushed.

use crate::error::{internal_error, invalid_params, invalid_request, parse_error};
use crate::handler::McpHandler;
use crate::types::{RpcResponse, DEFAULT_PROTOCOL_VERSION, JSONRPC_VERSION};
use atxp_mcp_core::application::ShutdownToken;
use rmcp::model::{ClientJsonRpcMessage, ClientRequest, JsonRpcMessage};
use rmcp::ServiceExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::io;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream, Lines,
    ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Pipe capacity between the gate and the rmcp service
const SERVICE_BUFFER_SIZE: usize = 64 * 1024;

/// Request id of the handshake run for clients that skip `initialize`
const HANDSHAKE_ID: &str = "atxp-mcp-handshake";

const INITIALIZE: &str = "initialize";
const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";

/// Requests with a typed body. One whose params do not fit is answered with
/// invalid params here instead of being treated as an unknown method.
const TYPED_REQUESTS: &[&str] = &[
    INITIALIZE,
    "ping",
    "tools/list",
    "tools/call",
    "prompts/list",
    "prompts/get",
    "resources/list",
    "resources/read",
    "resources/templates/list",
    "resources/subscribe",
    "resources/unsubscribe",
    "completion/complete",
    "logging/setLevel",
];

/// MCP Server
pub struct McpServer {
    handler: McpHandler,
}

impl McpServer {
    pub fn new(handler: McpHandler) -> Self {
        Self { handler }
    }

    /// Serve the process's own stdin/stdout until EOF or shutdown
    pub async fn run_stdio(&self, shutdown: ShutdownToken) -> io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout(), shutdown)
            .await
    }

    /// Serve any line-oriented byte stream pair
    pub async fn serve<R, W>(
        &self,
        reader: R,
        mut writer: W,
        mut shutdown: ShutdownToken,
    ) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut service = ServiceLink::start(self.handler.clone());
        let mut line = Vec::new();
        info!("MCP session started on stdio");

        let result = loop {
            line.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut line) => read,
                _ = shutdown.wait() => {
                    info!("Shutdown requested, ending MCP session");
                    break Ok(());
                }
            };

            match read {
                Ok(0) => {
                    info!("stdin closed, ending MCP session");
                    break Ok(());
                }
                Ok(_) => {}
                Err(e) => break Err(e),
            }

            match handle_line(&line, &mut service, &mut writer).await {
                Ok(true) => {}
                Ok(false) => {
                    error!("MCP service stopped, ending session");
                    break Err(io::Error::other("MCP service stopped"));
                }
                Err(e) => break Err(e),
            }
        };

        service.close().await;
        result
    }
}

/// Gate one raw line. `Ok(false)` once the service has gone away.
async fn handle_line<W>(line: &[u8], service: &mut ServiceLink, writer: &mut W) -> io::Result<bool>
where
    W: AsyncWrite + Unpin,
{
    match admit(line) {
        Admission::Ignore => Ok(true),
        Admission::Reply(response) => {
            write_json(writer, &response).await?;
            Ok(true)
        }
        Admission::Forward {
            message,
            id: None,
            method,
        } => {
            if service.initialized {
                service.send(&message).await?;
            } else {
                debug!(method = %method, "Dropping notification received before initialize");
            }
            Ok(true)
        }
        Admission::Forward {
            message,
            id: Some(id),
            method,
        } => {
            let client_initialize = !service.initialized && method == INITIALIZE;
            if !service.initialized && !client_initialize && !service.handshake().await? {
                return Ok(false);
            }

            debug!(method = %method, id = %id, "Request received");
            service.send(&message).await?;
            if !service.relay_until(&id, writer).await? {
                let response = RpcResponse::failure(id, internal_error("MCP service stopped"));
                write_json(writer, &response).await?;
                return Ok(false);
            }

            if client_initialize {
                service.send(&initialized_notification()).await?;
                service.initialized = true;
            }
            Ok(true)
        }
    }
}

/// What the gate does with one input line
#[derive(Debug)]
enum Admission {
    /// Answered here; the service never sees the line
    Reply(RpcResponse),
    /// Handed to the service; `id` is set when a response is owed
    Forward {
        message: Value,
        id: Option<Value>,
        method: String,
    },
    Ignore,
}

fn admit(line: &[u8]) -> Admission {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Admission::Ignore;
    }

    // Also rejects bytes that are not UTF-8
    let message = match serde_json::from_slice::<Value>(line) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Received malformed JSON");
            return Admission::Reply(RpcResponse::failure(Value::Null, parse_error(e)));
        }
    };

    let Value::Object(mut fields) = message else {
        return Admission::Reply(RpcResponse::failure(
            Value::Null,
            invalid_request("Request must be a JSON object"),
        ));
    };

    let id = fields.get("id").cloned();
    let reply_id = id.clone().unwrap_or(Value::Null);

    if fields.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Admission::Reply(RpcResponse::failure(
            reply_id,
            invalid_request("jsonrpc must be \"2.0\""),
        ));
    }

    let method = match fields.get("method") {
        Some(Value::String(method)) => method.clone(),
        // A response from the client; nothing to answer
        None if fields.contains_key("result") || fields.contains_key("error") => {
            return Admission::Ignore
        }
        _ => {
            return Admission::Reply(RpcResponse::failure(
                reply_id,
                invalid_request("method must be a string"),
            ))
        }
    };

    let Some(id) = id else {
        return admit_notification(Value::Object(fields), method);
    };

    if !is_request_id(&id) {
        return Admission::Reply(RpcResponse::failure(
            Value::Null,
            invalid_request("id must be a string or an integer"),
        ));
    }

    if method == INITIALIZE {
        fill_initialize_defaults(&mut fields);
    }
    let message = Value::Object(fields);

    match ClientJsonRpcMessage::deserialize(&message) {
        Ok(JsonRpcMessage::Request(request)) => {
            let untyped = matches!(request.request, ClientRequest::CustomRequest(_));
            if untyped && TYPED_REQUESTS.contains(&method.as_str()) {
                debug!(method = %method, "Request params do not match the method");
                return Admission::Reply(RpcResponse::failure(
                    id,
                    invalid_params(format!("Invalid params for {}", method)),
                ));
            }
            Admission::Forward {
                message,
                id: Some(id),
                method,
            }
        }
        Ok(_) => Admission::Reply(RpcResponse::failure(
            id,
            invalid_request("Not a JSON-RPC request"),
        )),
        Err(e) => Admission::Reply(RpcResponse::failure(
            id,
            invalid_request(format!("Invalid request: {}", e)),
        )),
    }
}

fn admit_notification(message: Value, method: String) -> Admission {
    // The gate sends its own once `initialize` has been answered
    if method == INITIALIZED_NOTIFICATION {
        return Admission::Ignore;
    }

    match ClientJsonRpcMessage::deserialize(&message) {
        Ok(JsonRpcMessage::Notification(_)) => Admission::Forward {
            message,
            id: None,
            method,
        },
        _ => {
            debug!(method = %method, "Dropping malformed notification");
            Admission::Ignore
        }
    }
}

fn is_request_id(id: &Value) -> bool {
    match id {
        Value::String(_) => true,
        Value::Number(n) => n.is_i64(),
        _ => false,
    }
}

/// Fill the `initialize` fields MCP requires but lenient clients leave out
fn fill_initialize_defaults(fields: &mut Map<String, Value>) {
    let params = fields.entry("params").or_insert_with(|| json!({}));
    if params.is_null() {
        *params = json!({});
    }
    let Value::Object(params) = params else {
        return;
    };

    params
        .entry("protocolVersion")
        .or_insert_with(|| json!(DEFAULT_PROTOCOL_VERSION));
    params.entry("capabilities").or_insert_with(|| json!({}));

    let client = params.entry("clientInfo").or_insert_with(|| json!({}));
    if let Value::Object(client) = client {
        client.entry("name").or_insert_with(|| json!("unknown"));
        client.entry("version").or_insert_with(|| json!("unknown"));
    }
}

fn initialized_notification() -> Value {
    json!({ "jsonrpc": JSONRPC_VERSION, "method": INITIALIZED_NOTIFICATION })
}

async fn write_json<W, T>(writer: &mut W, message: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let encoded = serde_json::to_vec(message)?;
    write_line(writer, &encoded).await
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    writer.write_all(line).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Line-level link to the rmcp service on the far end of an in-memory pipe
struct ServiceLink {
    input: WriteHalf<DuplexStream>,
    output: Lines<BufReader<ReadHalf<DuplexStream>>>,
    task: JoinHandle<()>,
    initialized: bool,
}

impl ServiceLink {
    fn start(handler: McpHandler) -> Self {
        let (gate, service) = tokio::io::duplex(SERVICE_BUFFER_SIZE);

        let task = tokio::spawn(async move {
            match handler.serve(tokio::io::split(service)).await {
                Ok(running) => match running.waiting().await {
                    Ok(reason) => debug!(reason = ?reason, "MCP service finished"),
                    Err(e) => error!(error = %e, "MCP service task failed"),
                },
                Err(e) => debug!(error = %e, "MCP service closed before initialization"),
            }
        });

        let (output, input) = tokio::io::split(gate);
        Self {
            input,
            output: BufReader::new(output).lines(),
            task,
            initialized: false,
        }
    }

    async fn send(&mut self, message: &Value) -> io::Result<()> {
        let encoded = serde_json::to_vec(message)?;
        write_line(&mut self.input, &encoded).await
    }

    /// Copy service output to `writer` up to and including the response to
    /// `id`. `Ok(false)` means the service closed first.
    async fn relay_until<W>(&mut self, id: &Value, writer: &mut W) -> io::Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = self.output.next_line().await? {
            write_line(writer, line.as_bytes()).await?;

            let answered = serde_json::from_str::<Value>(&line)
                .map(|message| message.get("method").is_none() && message.get("id") == Some(id))
                .unwrap_or(false);
            if answered {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Initialize the service on behalf of a client that went straight to
    /// other requests
    async fn handshake(&mut self) -> io::Result<bool> {
        debug!("No initialize from client, initializing with defaults");
        let mut fields = Map::new();
        fields.insert("jsonrpc".into(), json!(JSONRPC_VERSION));
        fields.insert("id".into(), json!(HANDSHAKE_ID));
        fields.insert("method".into(), json!(INITIALIZE));
        fill_initialize_defaults(&mut fields);

        self.send(&Value::Object(fields)).await?;
        if !self
            .relay_until(&json!(HANDSHAKE_ID), &mut tokio::io::sink())
            .await?
        {
            return Ok(false);
        }

        self.send(&initialized_notification()).await?;
        self.initialized = true;
        Ok(true)
    }

    /// Close the pipe and wait for the service to wind down
    async fn close(self) {
        let Self {
            input,
            output,
            task,
            ..
        } = self;
        drop(input);
        drop(output);
        if let Err(e) = task.await {
            debug!(error = %e, "MCP service task ended abnormally");
        }
    }
}

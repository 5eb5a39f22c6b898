//! ATXP MCP Adapter - Main Entry Point
//! stdio MCP server; each tool call runs `npx atxp@latest <subcommand>`.

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use atxp_mcp_api::{McpHandler, McpServer};
use atxp_mcp_core::application::{shutdown_channel, Catalog, Dispatcher};
use atxp_mcp_core::port::{FsConfigReader, SystemEnvironment};
use atxp_mcp_infra_system::{ConnectionResolver, SubprocessInvoker};

use crate::config::{AdapterConfig, Args};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let config = AdapterConfig::from_args(Args::parse());
    let _log_guard = logging::init(config.log_format);

    info!(
        version = VERSION,
        launcher = %config.launcher,
        package = %config.package,
        config_path = %config.config_path.display(),
        "ATXP MCP adapter starting"
    );

    // 2. Operation catalog
    let catalog = Arc::new(Catalog::standard().context("Invalid operation catalog")?);
    info!(tools = catalog.len(), "Operation catalog loaded");

    // 3. Setup dependencies (DI wiring)
    let resolver = Arc::new(ConnectionResolver::new(
        Arc::new(SystemEnvironment),
        Arc::new(FsConfigReader),
        config.config_path.clone(),
    ));
    let invoker = Arc::new(SubprocessInvoker::new(config.launch_config(), resolver));
    let dispatcher = Arc::new(Dispatcher::new(catalog, invoker));
    let server = McpServer::new(McpHandler::new(dispatcher));

    // 4. Ctrl+C ends the session between requests
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                shutdown_tx.shutdown();
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for Ctrl+C, serving until stdin closes");
                // The session ends when the sender drops, so hold it for good
                let _shutdown_tx = shutdown_tx;
                std::future::pending::<()>().await
            }
        }
    });

    // 5. Serve until stdin closes
    server
        .run_stdio(shutdown_rx)
        .await
        .context("stdio session failed")?;

    info!("Shutdown complete.");
    Ok(())
}

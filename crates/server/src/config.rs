//! Startup configuration: command-line flags with environment fallbacks

use atxp_mcp_core::application::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_LAUNCHER, DEFAULT_PACKAGE,
};
use atxp_mcp_infra_system::LaunchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, multi-line
    Pretty,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "atxp-mcp",
    version,
    about = "MCP server exposing the ATXP CLI as tools over stdio"
)]
pub struct Args {
    /// Program used to run the ATXP package
    #[arg(long, env = "ATXP_MCP_LAUNCHER", default_value = DEFAULT_LAUNCHER)]
    pub launcher: String,

    /// Package spec handed to the launcher
    #[arg(long, env = "ATXP_MCP_PACKAGE", default_value = DEFAULT_PACKAGE)]
    pub package: String,

    /// Credential file read when ATXP_CONNECTION is unset
    #[arg(long, env = "ATXP_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: String,

    /// Log output format (logs always go to stderr)
    #[arg(long, env = "ATXP_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Resolved, immutable adapter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub launcher: String,
    pub package: String,
    pub config_path: PathBuf,
    pub log_format: LogFormat,
}

impl AdapterConfig {
    pub fn from_args(args: Args) -> Self {
        Self {
            launcher: args.launcher,
            package: args.package,
            config_path: PathBuf::from(shellexpand::tilde(&args.config_path).into_owned()),
            log_format: args.log_format,
        }
    }

    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            launcher: self.launcher.clone(),
            package: self.package.clone(),
            ..LaunchConfig::default()
        }
    }
}

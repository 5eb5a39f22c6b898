// ATXP MCP Infrastructure - System Adapters
// Implements: CredentialSource, ProcessInvoker

pub mod connection_resolver;
pub mod subprocess_invoker;

pub use connection_resolver::ConnectionResolver;
pub use subprocess_invoker::{LaunchConfig, SubprocessInvoker};

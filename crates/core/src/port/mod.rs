// Port Layer - Interfaces for external dependencies

pub mod config_reader;
pub mod credential_source;
pub mod environment; // For deterministic testing
pub mod process_invoker;

// Re-exports
pub use config_reader::{ConfigReader, FsConfigReader};
pub use credential_source::CredentialSource;
pub use environment::{Environment, SystemEnvironment};
pub use process_invoker::ProcessInvoker;

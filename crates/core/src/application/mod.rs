// Application Layer - Use Cases

pub mod catalog;
pub mod command_builder;
pub mod constants;
pub mod dispatcher;
pub mod normalizer;
pub mod shutdown;
pub mod validation;

// Re-exports
pub use catalog::Catalog;
pub use command_builder::build_command;
pub use dispatcher::Dispatcher;
pub use normalizer::{classify, normalize};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use validation::validate;

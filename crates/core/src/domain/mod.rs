// Domain Layer - Pure adapter entities (no I/O)

pub mod command_line;
pub mod credential;
pub mod error;
pub mod invocation;
pub mod operation;

// Re-exports
pub use command_line::{escape_for_double_quotes, CommandLine};
pub use credential::{Credential, CONNECTION_ENV_VAR};
pub use error::DomainError;
pub use invocation::{ExitState, InvocationOutcome, InvocationResult, FALLBACK_MESSAGE};
pub use operation::{ArgSpec, OperationDescriptor, ParamKind, ParamSpec, ParamValue, Params};

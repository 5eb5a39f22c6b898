// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("Parameter '{name}' must be {expected}")]
    InvalidParameterType { name: String, expected: &'static str },

    #[error("Parameter '{name}' must be one of: {allowed}")]
    InvalidChoice { name: String, allowed: String },

    #[error("Tool arguments must be a JSON object")]
    ArgumentsNotObject,

    #[error("Operation '{operation}' references undeclared parameter '{param}'")]
    UndeclaredParameter { operation: String, param: String },

    #[error("Duplicate operation name: {0}")]
    DuplicateOperation(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;

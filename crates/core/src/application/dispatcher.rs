// Operation Dispatcher
//
// validate -> build command -> invoke -> normalize, for one named operation.

use crate::application::catalog::Catalog;
use crate::application::command_builder::build_command;
use crate::application::normalizer::normalize;
use crate::application::validation::validate;
use crate::error::{AppError, Result};
use crate::port::ProcessInvoker;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Routes requests to the external program.
///
/// Holds no mutable state; the catalog is fixed at construction.
pub struct Dispatcher {
    catalog: Arc<Catalog>,
    invoker: Arc<dyn ProcessInvoker>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<Catalog>, invoker: Arc<dyn ProcessInvoker>) -> Self {
        Self { catalog, invoker }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one operation and return its response text.
    ///
    /// # Errors
    /// - `AppError::UnknownOperation` if `name` is not registered
    /// - `AppError::Domain` if `arguments` do not match the schema
    ///
    /// Failures of the external program are not errors: they come back as
    /// text like any other output.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> Result<String> {
        let descriptor = self
            .catalog
            .get(name)
            .ok_or_else(|| AppError::UnknownOperation(name.to_string()))?;

        let params = validate(descriptor, arguments)?;
        let command = build_command(descriptor, &params);

        debug!(operation = name, command = %command, "Built command line");
        info!(
            operation = name,
            timeout_ms = descriptor.timeout.as_millis() as u64,
            "Dispatching operation"
        );

        let result = self.invoker.invoke(&command, descriptor.timeout).await;
        let text = normalize(&result);

        info!(
            operation = name,
            exit = ?result.exit,
            duration_ms = result.duration_ms,
            "Operation completed"
        );

        Ok(text)
    }
}

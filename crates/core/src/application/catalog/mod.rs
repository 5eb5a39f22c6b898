// Operation Catalog - read-only registry built once at startup

mod operations;

use crate::domain::error::Result;
use crate::domain::{DomainError, OperationDescriptor};
use std::collections::HashMap;

/// Registry of operations, in declaration order
#[derive(Debug, Clone)]
pub struct Catalog {
    operations: Vec<OperationDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names and templates that read
    /// parameters the operation never declares.
    pub fn new(operations: Vec<OperationDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(operations.len());

        for (position, op) in operations.iter().enumerate() {
            if index.insert(op.name, position).is_some() {
                return Err(DomainError::DuplicateOperation(op.name.to_string()));
            }

            if let Some(param) = op
                .template
                .iter()
                .filter_map(|arg| arg.param())
                .find(|param| op.find_param(param).is_none())
            {
                return Err(DomainError::UndeclaredParameter {
                    operation: op.name.to_string(),
                    param: param.to_string(),
                });
            }
        }

        Ok(Self { operations, index })
    }

    /// The full ATXP tool set
    pub fn standard() -> Result<Self> {
        Self::new(operations::all())
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

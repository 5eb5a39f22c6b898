// Operation Domain Model
//
// An operation is one MCP tool: a name, a parameter schema and an argument
// template that turns validated parameters into a CLI invocation.

use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::application::constants::DEFAULT_OPERATION_TIMEOUT;

/// Parameter type (shape only, no business validation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    Enum(&'static [&'static str]),
    StringList,
}

impl ParamKind {
    /// JSON Schema fragment for `tools/list`
    fn json_schema(&self, description: &str) -> Value {
        match self {
            ParamKind::String => json!({ "type": "string", "description": description }),
            ParamKind::Number => json!({ "type": "number", "description": description }),
            ParamKind::Boolean => json!({ "type": "boolean", "description": description }),
            ParamKind::Enum(variants) => json!({
                "type": "string",
                "enum": variants,
                "description": description,
            }),
            ParamKind::StringList => json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description,
            }),
        }
    }
}

/// Declared parameter of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// One element of an argument template, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSpec {
    /// Fixed token(s), e.g. `email send`
    Literal(&'static str),
    /// Parameter value without a flag
    Positional(&'static str),
    /// `--flag <value>`, omitted when the parameter is absent
    Flag(&'static str, &'static str),
    /// `--flag`, emitted only when the boolean parameter is true
    Switch(&'static str, &'static str),
    /// `--flag <v>` once per list element, in input order
    Repeated(&'static str, &'static str),
}

impl ArgSpec {
    /// Name of the parameter this element reads, if any
    pub fn param(&self) -> Option<&'static str> {
        match *self {
            ArgSpec::Literal(_) => None,
            ArgSpec::Positional(p)
            | ArgSpec::Flag(_, p)
            | ArgSpec::Switch(_, p)
            | ArgSpec::Repeated(_, p) => Some(p),
        }
    }
}

/// Static description of one externally visible operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub template: Vec<ArgSpec>,
    pub timeout: Duration,
}

impl OperationDescriptor {
    /// Start a descriptor whose template begins with `command`
    pub fn new(name: &'static str, description: &'static str, command: &'static str) -> Self {
        Self {
            name,
            description,
            params: Vec::new(),
            template: vec![ArgSpec::Literal(command)],
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.template.push(spec);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn find_param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON Schema object advertised as the tool's `inputSchema`
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.kind.json_schema(p.description)))
            .collect();

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

/// Validated parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Choice(String),
    List(Vec<String>),
}

/// Validated parameters of one request, keyed by declared name.
/// Absent optional parameters simply have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

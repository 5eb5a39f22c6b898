// Parameter validation against an operation's declared schema
//
// Type/shape checks only: required presence, JSON type, enum membership.
// No cross-field business rules; the external program owns those.

use crate::domain::error::Result;
use crate::domain::{DomainError, OperationDescriptor, ParamKind, ParamSpec, ParamValue, Params};
use serde_json::Value;
use tracing::debug;

/// Validate a `tools/call` arguments value.
///
/// `null` is accepted as "no arguments". Keys not declared by the operation
/// are ignored. An explicit `null` for an optional parameter counts as absent.
pub fn validate(descriptor: &OperationDescriptor, arguments: &Value) -> Result<Params> {
    let empty = serde_json::Map::new();
    let args = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(DomainError::ArgumentsNotObject),
    };

    for key in args.keys() {
        if descriptor.find_param(key).is_none() {
            debug!(operation = descriptor.name, key = %key, "Ignoring undeclared argument");
        }
    }

    let mut params = Params::new();
    for spec in &descriptor.params {
        match args.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(DomainError::MissingParameter(spec.name.to_string()));
                }
            }
            Some(raw) => params.insert(spec.name, convert(spec, raw)?),
        }
    }

    Ok(params)
}

fn convert(spec: &ParamSpec, raw: &Value) -> Result<ParamValue> {
    let type_error = |expected: &'static str| DomainError::InvalidParameterType {
        name: spec.name.to_string(),
        expected,
    };

    match spec.kind {
        ParamKind::String => raw
            .as_str()
            .map(|s| ParamValue::Text(s.to_string()))
            .ok_or_else(|| type_error("a string")),
        ParamKind::Number => match raw {
            Value::Number(n) => Ok(ParamValue::Number(n.clone())),
            _ => Err(type_error("a number")),
        },
        ParamKind::Boolean => raw
            .as_bool()
            .map(ParamValue::Bool)
            .ok_or_else(|| type_error("a boolean")),
        ParamKind::Enum(variants) => {
            let s = raw.as_str().ok_or_else(|| type_error("a string"))?;
            if variants.contains(&s) {
                Ok(ParamValue::Choice(s.to_string()))
            } else {
                Err(DomainError::InvalidChoice {
                    name: spec.name.to_string(),
                    allowed: variants.join(", "),
                })
            }
        }
        ParamKind::StringList => {
            let items = raw
                .as_array()
                .ok_or_else(|| type_error("an array of strings"))?;
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::List)
                .ok_or_else(|| type_error("an array of strings"))
        }
    }
}

use cmdbridge_types::ARGS_PARAMETER;
use serde_json::{Map, Value};

/// Caller-supplied arguments split into flag values and positional values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationRequest {
    pub named: Map<String, Value>,
    pub positional: Vec<String>,
}

impl InvocationRequest {
    /// Split a tool call's argument object.
    ///
    /// `args` must be an array; non-string and empty entries are dropped.
    /// Every other key is kept as a named parameter.
    pub fn from_arguments(arguments: Option<Map<String, Value>>) -> Self {
        let mut named = arguments.unwrap_or_default();
        let positional = match named.remove(ARGS_PARAMETER) {
            Some(Value::Array(values)) => values
                .into_iter()
                .filter_map(|value| match value {
                    Value::String(text) if !text.is_empty() => Some(text),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { named, positional }
    }
}

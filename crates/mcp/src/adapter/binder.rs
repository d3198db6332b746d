//! Translates named parameters and positional values into a command's
//! flag state.

use std::collections::{BTreeMap, BTreeSet};

use cmdbridge_registry::{Command, FlagSet};
use cmdbridge_types::{ARGS_PARAMETER, CommandId};
use serde_json::{Map, Value};

use super::errors::AdapterError;

/// A command with parsed flags and initialized positional arguments.
pub struct BoundCommand {
    pub(crate) id: CommandId,
    pub(crate) command: Box<dyn Command>,
    flags: FlagSet,
    positional: Vec<String>,
}

impl BoundCommand {
    pub fn id(&self) -> &CommandId {
        &self.id
    }

    /// Effective value of every declared flag after binding.
    pub fn flag_state(&self) -> BTreeMap<String, String> {
        self.flags.state()
    }

    pub fn positional_args(&self) -> &[String] {
        &self.positional
    }
}

impl std::fmt::Debug for BoundCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundCommand")
            .field("id", &self.id)
            .field("flags", &self.flags)
            .field("positional", &self.positional)
            .finish_non_exhaustive()
    }
}

/// Populate a fresh flag set for `command` and initialize it.
///
/// Fixed flags are applied first and cannot be overridden. Named parameters
/// skip `args`, disabled names and undeclared names; empty values count as
/// not provided.
pub fn bind(
    mut command: Box<dyn Command>,
    id: &CommandId,
    disabled: &BTreeSet<String>,
    fixed_flags: &BTreeMap<String, String>,
    named: &Map<String, Value>,
    positional: Vec<String>,
) -> Result<BoundCommand, AdapterError> {
    let mut flags = FlagSet::new(id.as_str());
    command.set_flags(&mut flags);

    for (name, value) in fixed_flags {
        flags
            .set(name, value.clone())
            .map_err(|_| AdapterError::internal(id.as_str(), format!("fixed flag '{name}' is not declared by the command")))?;
    }

    for (name, value) in named {
        if name == ARGS_PARAMETER || disabled.contains(name) || fixed_flags.contains_key(name) || !flags.contains(name) {
            continue;
        }
        let Some(raw) = coerce(value).filter(|raw| !raw.is_empty()) else {
            continue;
        };
        flags
            .set(name, raw)
            .map_err(|error| AdapterError::invalid_argument(id.as_str(), Some(name.clone()), error.to_string()))?;
    }

    flags
        .parse()
        .map_err(|error| AdapterError::invalid_argument(id.as_str(), Some(error.flag().to_string()), error.to_string()))?;

    command
        .init(&flags, positional.clone())
        .map_err(|error| AdapterError::invalid_argument(id.as_str(), None, error.to_string()))?;

    Ok(BoundCommand {
        id: id.clone(),
        command,
        flags,
        positional,
    })
}

/// String form of a parameter value; `None` for JSON null.
pub fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(format_number(number)),
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

// f64 Display is plain decimal without trailing zeros ("1.5", "2", "0.1").
fn format_number(number: &serde_json::Number) -> String {
    if let Some(integer) = number.as_i64() {
        integer.to_string()
    } else if let Some(unsigned) = number.as_u64() {
        unsigned.to_string()
    } else {
        number.as_f64().map_or_else(|| number.to_string(), |float| float.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_have_no_trailing_zeros() {
        assert_eq!(coerce(&json!(3)), Some("3".into()));
        assert_eq!(coerce(&json!(2.0)), Some("2".into()));
        assert_eq!(coerce(&json!(1.50)), Some("1.5".into()));
        assert_eq!(coerce(&json!(-0.25)), Some("-0.25".into()));
    }

    #[test]
    fn booleans_and_strings_coerce_verbatim() {
        assert_eq!(coerce(&json!(true)), Some("true".into()));
        assert_eq!(coerce(&json!("x y")), Some("x y".into()));
        assert_eq!(coerce(&Value::Null), None);
        assert_eq!(coerce(&json!(["a", 1])), Some(r#"["a",1]"#.into()));
    }
}

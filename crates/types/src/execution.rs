use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::command::CommandId;

/// Everything needed to run one command invocation.
///
/// Built per call and dropped once the command returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub command_id: CommandId,
    /// Applied before `flag_values`; wins over caller-supplied values.
    pub fixed_flags: BTreeMap<String, String>,
    pub flag_values: Map<String, Value>,
    pub positional_args: Vec<String>,
}

impl ExecutionConfig {
    pub fn new(command_id: impl Into<CommandId>) -> Self {
        Self {
            command_id: command_id.into(),
            fixed_flags: BTreeMap::new(),
            flag_values: Map::new(),
            positional_args: Vec::new(),
        }
    }
}

/// Static declaration of a URI-templated resource backed by a command.
///
/// `uri_to_args` values are positional indices kept as text so that a
/// malformed table is reported at read time instead of rejected by serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTemplateConfig {
    /// e.g. `juju://config-doc/{app}`
    pub uri_template: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub command_id: CommandId,
    #[serde(default)]
    pub fixed_flags: BTreeMap<String, String>,
    #[serde(default)]
    pub uri_to_args: IndexMap<String, String>,
    #[serde(default)]
    pub uri_to_flags: IndexMap<String, String>,
}

impl ResourceTemplateConfig {
    /// First path segment of the template, identifying which resource it serves.
    pub fn resource_kind(&self) -> Option<&str> {
        let path = self
            .uri_template
            .split_once("://")
            .map_or(self.uri_template.as_str(), |(_, rest)| rest);
        path.split('/').next().filter(|kind| !kind.is_empty())
    }

    /// Position of `{var}` among the template's path segments, kind segment excluded.
    pub fn variable_position(&self, var: &str) -> Option<usize> {
        let placeholder = format!("{{{var}}}");
        let path = self
            .uri_template
            .split_once("://")
            .map_or(self.uri_template.as_str(), |(_, rest)| rest);
        path.split('/')
            .skip(1)
            .position(|segment| segment == placeholder)
    }
}

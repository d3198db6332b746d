//! Serialized catalog manifest.
//!
//! A manifest declares an external program and the subcommands of it that
//! should be exposed, together with resource templates over those commands.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::command::{CommandDefinition, CommandId, CommandInfo, TransportMode};
use crate::execution::ResourceTemplateConfig;
use crate::flag::{FlagDescriptor, FlagKind, parse_bool};

fn default_scheme() -> String {
    "cmd".to_string()
}

fn default_flag_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// URI scheme used for documentation and templated resources.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Executable that implements the commands.
    pub program: String,
    /// Arguments placed before the command identifier.
    #[serde(default)]
    pub program_args: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandManifest>,
    #[serde(default)]
    pub resource_templates: Vec<ResourceTemplateConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandManifest {
    pub id: CommandId,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub args: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub examples: String,
    #[serde(default)]
    pub see_also: Vec<String>,
    #[serde(default)]
    pub flags: Vec<FlagManifest>,
    #[serde(default)]
    pub min_args: Option<usize>,
    #[serde(default)]
    pub max_args: Option<usize>,
    #[serde(default)]
    pub disabled_args: BTreeMap<TransportMode, BTreeSet<String>>,
}

impl CommandManifest {
    pub fn definition(&self) -> CommandDefinition {
        CommandDefinition {
            id: self.id.clone(),
            disabled_args: self.disabled_args.clone(),
        }
    }

    pub fn info(&self) -> CommandInfo {
        CommandInfo {
            name: self.id.to_string(),
            purpose: self.purpose.clone(),
            args: self.args.clone(),
            doc: self.doc.clone(),
            examples: self.examples.clone(),
            see_also: self.see_also.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagManifest {
    pub name: String,
    /// Free-form type name, classified with [`FlagKind::from_type_name`].
    #[serde(rename = "type", default = "default_flag_type")]
    pub type_name: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub usage: String,
}

impl FlagManifest {
    pub fn descriptor(&self) -> FlagDescriptor {
        let kind = FlagKind::from_type_name(&self.type_name);
        let default_value = match kind {
            FlagKind::Bool => parse_bool(&self.default).unwrap_or(false).to_string(),
            _ => self.default.clone(),
        };
        FlagDescriptor::new(self.name.clone(), kind, default_value, self.usage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_manifest_with_defaults() {
        let yaml = r#"
program: juju
commands:
  - id: status
    purpose: Report the status of the model.
    flags:
      - name: format
        default: tabular
      - name: relations
        type: bool
resource_templates:
  - uri_template: "cmd://status-doc/{app}"
    name: status-by-app
    command_id: status
    uri_to_args: { app: "0" }
"#;
        let manifest: CatalogManifest = serde_yaml::from_str(yaml).expect("manifest");
        assert_eq!(manifest.scheme, "cmd");
        let status = &manifest.commands[0];
        let format = status.flags[0].descriptor();
        assert_eq!(format.kind, FlagKind::String);
        let relations = status.flags[1].descriptor();
        assert_eq!(relations.kind, FlagKind::Bool);
        assert_eq!(relations.default_value, "false");
        assert_eq!(manifest.resource_templates[0].uri_to_args["app"], "0");
    }

    #[test]
    fn bool_defaults_are_canonical() {
        let flag = |default: &str| FlagManifest {
            name: "color".into(),
            type_name: "bool".into(),
            default: default.into(),
            usage: String::new(),
        };
        assert_eq!(flag("True").descriptor().default_value, "true");
        assert_eq!(flag("yes").descriptor().default_value, "true");
        assert_eq!(flag("0").descriptor().default_value, "false");
        assert_eq!(flag("").descriptor().default_value, "false");
    }
}

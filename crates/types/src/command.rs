use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Stable identifier naming one operation in the catalog.
///
/// The identifier doubles as the public tool name, so it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CommandId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for CommandId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Static information block a command reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    /// Command name as the underlying framework knows it.
    pub name: String,
    /// One-line summary used as the tool description.
    #[serde(default)]
    pub purpose: String,
    /// Usage text for positional arguments (e.g. `<application> [<unit>...]`).
    #[serde(default)]
    pub args: String,
    /// Long-form documentation.
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub examples: String,
    #[serde(default)]
    pub see_also: Vec<String>,
}

/// Transport over which the tools are exposed.
///
/// Some arguments only make sense locally (file paths, interactive browser
/// logins), so the disabled-argument set depends on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Http,
    Stdio,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Stdio => "stdio",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransportModeError(pub String);

impl fmt::Display for ParseTransportModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transport mode '{}' (expected 'http' or 'stdio')", self.0)
    }
}

impl std::error::Error for ParseTransportModeError {}

impl FromStr for TransportMode {
    type Err = ParseTransportModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "stdio" => Ok(Self::Stdio),
            _ => Err(ParseTransportModeError(s.to_string())),
        }
    }
}

/// Catalog entry metadata: the identifier and the arguments each transport
/// refuses to expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub id: CommandId,
    #[serde(default)]
    pub disabled_args: BTreeMap<TransportMode, BTreeSet<String>>,
}

impl CommandDefinition {
    pub fn new(id: impl Into<CommandId>) -> Self {
        Self {
            id: id.into(),
            disabled_args: BTreeMap::new(),
        }
    }

    /// Disable `names` for the given transport.
    pub fn with_disabled<I, S>(mut self, mode: TransportMode, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_args
            .entry(mode)
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Disabled arguments for `mode`; empty when the transport has none.
    pub fn disabled_for(&self, mode: TransportMode) -> BTreeSet<String> {
        self.disabled_args.get(&mode).cloned().unwrap_or_default()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of value kinds a flag can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    Bool,
    Int,
    Float,
    #[default]
    String,
}

impl FlagKind {
    /// Classify a free-form type name (e.g. `"bool"`, `"uint64"`, `"*flagValue"`).
    ///
    /// Matching is case-insensitive substring containment checked in the
    /// order `bool`, `int`, `float`. Anything unrecognized is a string.
    pub fn from_type_name(type_name: &str) -> Self {
        let lowered = type_name.to_ascii_lowercase();
        if lowered.contains("bool") {
            Self::Bool
        } else if lowered.contains("int") {
            Self::Int
        } else if lowered.contains("float") {
            Self::Float
        } else {
            Self::String
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a boolean flag value the way command lines spell it.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Declaration of a single command flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDescriptor {
    pub name: String,
    pub kind: FlagKind,
    /// Raw default as the command framework renders it (`"false"`, `"0"`, `""`).
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub usage: String,
}

impl FlagDescriptor {
    pub fn new(name: impl Into<String>, kind: FlagKind, default_value: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            default_value: default_value.into(),
            usage: usage.into(),
        }
    }
}

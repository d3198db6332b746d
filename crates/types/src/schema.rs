use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::flag::{FlagDescriptor, FlagKind, parse_bool};

/// Reserved parameter carrying positional command arguments.
pub const ARGS_PARAMETER: &str = "args";

/// Wire-level kind of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Boolean,
    Number,
    String,
    StringArray,
}

impl ParameterKind {
    fn json_type(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::StringArray => "array",
        }
    }
}

/// One named parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
    /// Default coerced to `kind`; `None` for parameters without one.
    pub default: Option<Value>,
}

impl ToolParameter {
    /// The synthetic positional-arguments parameter.
    pub fn positional_args() -> Self {
        Self {
            name: ARGS_PARAMETER.to_string(),
            kind: ParameterKind::StringArray,
            description: "positional arguments for the command".to_string(),
            default: None,
        }
    }

    /// Derive a parameter from a flag declaration.
    ///
    /// Numeric flags whose default does not parse degrade to strings so that
    /// a single odd flag never prevents the tool from being published.
    pub fn from_flag(flag: &FlagDescriptor) -> Self {
        let (kind, default) = match flag.kind {
            FlagKind::Bool => (ParameterKind::Boolean, Value::Bool(parse_bool(&flag.default_value).unwrap_or(false))),
            FlagKind::Int | FlagKind::Float => match numeric_default(&flag.default_value) {
                Some(number) => (ParameterKind::Number, number),
                None => (ParameterKind::String, Value::String(flag.default_value.clone())),
            },
            FlagKind::String => (ParameterKind::String, Value::String(flag.default_value.clone())),
        };
        Self {
            name: flag.name.clone(),
            kind,
            description: flag.usage.clone(),
            default: Some(default),
        }
    }

    fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), Value::String(self.kind.json_type().into()));
        if self.kind == ParameterKind::StringArray {
            property.insert("items".into(), json!({ "type": "string" }));
        }
        if !self.description.is_empty() {
            property.insert("description".into(), Value::String(self.description.clone()));
        }
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        Value::Object(property)
    }
}

fn numeric_default(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Value::from(integer));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Ordered parameter list published for one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub parameters: Vec<ToolParameter>,
}

impl ParameterSchema {
    pub fn get(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|parameter| parameter.name.as_str())
    }

    /// Render as a JSON-schema object suitable for a tool's input schema.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|parameter| (parameter.name.clone(), parameter.to_json_schema()))
            .collect();
        let mut schema = Map::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_flag_with_unparseable_default_is_a_string() {
        let flag = FlagDescriptor::new("timeout", FlagKind::Int, "10m", "how long to wait");
        let parameter = ToolParameter::from_flag(&flag);
        assert_eq!(parameter.kind, ParameterKind::String);
        assert_eq!(parameter.default, Some(Value::String("10m".into())));
    }

    #[test]
    fn float_default_is_a_number() {
        let flag = FlagDescriptor::new("ratio", FlagKind::Float, "0.5", "");
        let parameter = ToolParameter::from_flag(&flag);
        assert_eq!(parameter.kind, ParameterKind::Number);
        assert_eq!(parameter.default, Some(json!(0.5)));
    }

    #[test]
    fn bool_default_accepts_flag_spellings() {
        let on = ToolParameter::from_flag(&FlagDescriptor::new("a", FlagKind::Bool, "true", ""));
        let shouted = ToolParameter::from_flag(&FlagDescriptor::new("b", FlagKind::Bool, "TRUE", ""));
        let off = ToolParameter::from_flag(&FlagDescriptor::new("c", FlagKind::Bool, "false", ""));
        assert_eq!(on.default, Some(Value::Bool(true)));
        assert_eq!(shouted.default, Some(Value::Bool(true)));
        assert_eq!(off.default, Some(Value::Bool(false)));
    }

    #[test]
    fn json_schema_describes_args_as_string_array() {
        let schema = ParameterSchema {
            parameters: vec![ToolParameter::positional_args()],
        };
        let rendered = Value::Object(schema.to_json_schema());
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["args"]["type"], "array");
        assert_eq!(rendered["properties"]["args"]["items"]["type"], "string");
    }
}

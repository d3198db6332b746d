//! Typed flag sets.
//!
//! Every flag carries an explicit [`FlagKind`] from the moment it is
//! declared, so values can be validated and normalized without inspecting
//! runtime types.

use std::collections::BTreeMap;

use cmdbridge_types::{FlagDescriptor, FlagKind, parse_bool};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    #[error("flag provided but not defined: --{name}")]
    Unknown { name: String },

    #[error("invalid value {value:?} for flag --{flag}: expected {kind}")]
    InvalidValue { flag: String, value: String, kind: FlagKind },
}

impl FlagError {
    /// Name of the flag the error refers to.
    pub fn flag(&self) -> &str {
        match self {
            Self::Unknown { name } => name,
            Self::InvalidValue { flag, .. } => flag,
        }
    }
}

/// Flags declared by one command plus the values set on them.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    name: String,
    declared: IndexMap<String, FlagDescriptor>,
    values: IndexMap<String, String>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a flag. A later declaration with the same name replaces the earlier one.
    pub fn declare(&mut self, descriptor: FlagDescriptor) -> &mut Self {
        self.values.shift_remove(&descriptor.name);
        self.declared.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn bool_flag(&mut self, name: &str, default: bool, usage: &str) -> &mut Self {
        self.declare(FlagDescriptor::new(name, FlagKind::Bool, default.to_string(), usage))
    }

    pub fn int_flag(&mut self, name: &str, default: i64, usage: &str) -> &mut Self {
        self.declare(FlagDescriptor::new(name, FlagKind::Int, default.to_string(), usage))
    }

    pub fn float_flag(&mut self, name: &str, default: f64, usage: &str) -> &mut Self {
        self.declare(FlagDescriptor::new(name, FlagKind::Float, default.to_string(), usage))
    }

    pub fn string_flag(&mut self, name: &str, default: &str, usage: &str) -> &mut Self {
        self.declare(FlagDescriptor::new(name, FlagKind::String, default, usage))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }

    pub fn descriptor(&self, name: &str) -> Option<&FlagDescriptor> {
        self.declared.get(name)
    }

    /// Declared flags in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FlagDescriptor> {
        self.declared.values()
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Record a raw value for `name`. Validation happens in [`FlagSet::parse`].
    pub fn set(&mut self, name: &str, raw: impl Into<String>) -> Result<(), FlagError> {
        if !self.declared.contains_key(name) {
            return Err(FlagError::Unknown { name: name.to_string() });
        }
        self.values.insert(name.to_string(), raw.into());
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Validate and normalize every explicitly set value.
    ///
    /// A value equal to the flag's declared default is accepted verbatim.
    pub fn parse(&mut self) -> Result<(), FlagError> {
        for (name, raw) in self.values.iter_mut() {
            let Some(descriptor) = self.declared.get(name) else {
                return Err(FlagError::Unknown { name: name.clone() });
            };
            if *raw == descriptor.default_value {
                continue;
            }
            let normalized = normalize(descriptor.kind, raw.as_str()).ok_or_else(|| FlagError::InvalidValue {
                flag: name.clone(),
                value: raw.clone(),
                kind: descriptor.kind,
            })?;
            *raw = normalized;
        }
        Ok(())
    }

    /// Explicit value, falling back to the declared default.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .or_else(|| self.declared.get(name).map(|descriptor| descriptor.default_value.as_str()))
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(|raw| normalize(FlagKind::Bool, raw)).map(|raw| raw == "true")
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(|raw| raw.trim().parse().ok())
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(|raw| raw.trim().parse().ok())
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.value(name)
    }

    /// Explicitly set values in the order they were first set.
    pub fn explicit_values(&self) -> impl Iterator<Item = (&FlagDescriptor, &str)> {
        self.values
            .iter()
            .filter_map(|(name, raw)| self.declared.get(name).map(|descriptor| (descriptor, raw.as_str())))
    }

    /// Effective value of every declared flag, normalized where possible.
    pub fn state(&self) -> BTreeMap<String, String> {
        self.declared
            .values()
            .map(|descriptor| {
                let raw = self.value(&descriptor.name).unwrap_or_default();
                let effective = normalize(descriptor.kind, raw).unwrap_or_else(|| raw.to_string());
                (descriptor.name.clone(), effective)
            })
            .collect()
    }
}

fn normalize(kind: FlagKind, raw: &str) -> Option<String> {
    match kind {
        FlagKind::Bool => parse_bool(raw).map(|value| value.to_string()),
        FlagKind::Int => raw.trim().parse::<i64>().ok().map(|value| value.to_string()),
        FlagKind::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| value.to_string()),
        FlagKind::String => Some(raw.to_string()),
    }
}

//! Static command catalog built once at startup.

use std::fmt;
use std::sync::Arc;

use cmdbridge_types::{CommandDefinition, CommandId};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::command::Command;

static COMMAND_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("command id regex should compile"));

pub type CommandConstructor = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("command '{id}' is registered more than once")]
    DuplicateCommand { id: String },

    #[error("command identifier '{id}' is not a valid tool name")]
    InvalidIdentifier { id: String },
}

/// One row of the registration table.
#[derive(Clone)]
pub struct CatalogEntry {
    pub definition: CommandDefinition,
    pub constructor: CommandConstructor,
}

impl CatalogEntry {
    pub fn new<F>(definition: CommandDefinition, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn Command> + Send + Sync + 'static,
    {
        Self {
            definition,
            constructor: Arc::new(constructor),
        }
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    pub fn register(mut self, entry: CatalogEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn register_all(mut self, entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Validate the table and freeze it.
    pub fn build(self) -> Result<CommandCatalog, CatalogError> {
        let mut entries = IndexMap::with_capacity(self.entries.len());
        for entry in self.entries {
            let id = entry.definition.id.clone();
            if !is_valid_identifier(id.as_str()) {
                return Err(CatalogError::InvalidIdentifier { id: id.to_string() });
            }
            if entries.contains_key(&id) {
                return Err(CatalogError::DuplicateCommand { id: id.to_string() });
            }
            debug!(command = %id, "registered command");
            entries.insert(id, entry);
        }
        Ok(CommandCatalog { entries })
    }
}

fn is_valid_identifier(id: &str) -> bool {
    COMMAND_ID_PATTERN.is_match(id)
}

/// Read-only registry of the commands available for exposure.
#[derive(Debug, Default)]
pub struct CommandCatalog {
    entries: IndexMap<CommandId, CatalogEntry>,
}

impl CommandCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn definition_of(&self, id: &str) -> Option<&CommandDefinition> {
        self.entries.get(id).map(|entry| &entry.definition)
    }

    /// Identifiers in registration order.
    pub fn all_ids(&self) -> Vec<CommandId> {
        self.entries.keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn constructor(&self, id: &str) -> Option<&CommandConstructor> {
        self.entries.get(id).map(|entry| &entry.constructor)
    }
}

use std::sync::Arc;

use thiserror::Error;

use crate::catalog::CommandCatalog;
use crate::command::Command;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    #[error("unknown command '{id}'")]
    UnknownCommand { id: String },
}

/// Builds fresh command instances from the catalog's constructors.
#[derive(Debug, Clone)]
pub struct CommandFactory {
    catalog: Arc<CommandCatalog>,
}

impl CommandFactory {
    pub fn new(catalog: Arc<CommandCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Construct an independent instance of `id`. Performs no I/O.
    pub fn create(&self, id: &str) -> Result<Box<dyn Command>, FactoryError> {
        let constructor = self
            .catalog
            .constructor(id)
            .ok_or_else(|| FactoryError::UnknownCommand { id: id.to_string() })?;
        Ok(constructor())
    }
}

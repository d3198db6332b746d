//! Command framework and catalog for cmdbridge.
//!
//! This crate provides the typed flag set, the [`Command`] capability, the
//! startup-time [`CommandCatalog`] with its [`CommandFactory`], and the
//! manifest-driven [`ProcessCommand`] that wraps an external program.

pub mod catalog;
pub mod command;
pub mod config;
pub mod factory;
pub mod flags;
pub mod process;

pub use catalog::{CatalogBuilder, CatalogEntry, CatalogError, CommandCatalog, CommandConstructor};
pub use command::{Command, CommandError, CommandOutput, ExecutionContext};
pub use config::{CATALOG_PATH_ENV, CatalogSource, ManifestError, load_catalog_manifest, resolve_catalog_source, validate_manifest};
pub use factory::{CommandFactory, FactoryError};
pub use flags::{FlagError, FlagSet};
pub use process::{ProcessCommand, ProcessProgram, catalog_from_manifest};

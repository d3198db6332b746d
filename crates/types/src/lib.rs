//! Shared type definitions for the cmdbridge workspace.
//!
//! These types describe commands, their flags, the parameter schema published
//! for each tool, and the per-invocation execution configuration. They carry
//! no behavior beyond small conversions so that every crate can depend on
//! them without pulling in the command framework or the protocol layer.

pub mod command;
pub mod execution;
pub mod flag;
pub mod manifest;
pub mod schema;

pub use command::{CommandDefinition, CommandId, CommandInfo, ParseTransportModeError, TransportMode};
pub use execution::{ExecutionConfig, ResourceTemplateConfig};
pub use flag::{FlagDescriptor, FlagKind, parse_bool};
pub use manifest::{CatalogManifest, CommandManifest, FlagManifest};
pub use schema::{ARGS_PARAMETER, ParameterKind, ParameterSchema, ToolParameter};

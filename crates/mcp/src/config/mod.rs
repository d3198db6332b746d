//! Server configuration: transport selection, bind address and endpoint.

mod model;
mod validation;

pub use model::{DEFAULT_ENDPOINT, DEFAULT_HOST, DEFAULT_PORT, ServerConfig, ServerType};
pub use validation::{ValidationError, validate_config};

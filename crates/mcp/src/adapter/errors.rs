//! Errors surfaced by the command-to-tool adapter.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },

    #[error("unknown resource '{uri}'")]
    UnknownResource { uri: String },

    #[error("invalid argument for '{command}': {message}")]
    InvalidArgument {
        command: String,
        flag: Option<String>,
        message: String,
    },

    #[error("{command} failed: {message}")]
    ExecutionFailed {
        command: String,
        message: String,
        stderr: String,
    },

    #[error("internal configuration error for '{command}': {message}")]
    InternalConfiguration { command: String, message: String },

    #[error("{command} was cancelled")]
    Cancelled { command: String },
}

impl AdapterError {
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand { command: command.into() }
    }

    pub fn unknown_resource(uri: impl Into<String>) -> Self {
        Self::UnknownResource { uri: uri.into() }
    }

    pub fn invalid_argument(command: impl Into<String>, flag: Option<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            flag,
            message: message.into(),
        }
    }

    pub fn internal(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InternalConfiguration {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Command the error concerns, when there is one.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::UnknownCommand { command }
            | Self::InvalidArgument { command, .. }
            | Self::ExecutionFailed { command, .. }
            | Self::InternalConfiguration { command, .. }
            | Self::Cancelled { command } => Some(command),
            Self::UnknownResource { .. } => None,
        }
    }
}

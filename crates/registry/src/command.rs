//! The capability every exposed command implements.

use async_trait::async_trait;
use cmdbridge_types::{CommandId, CommandInfo};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::flags::{FlagError, FlagSet};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{command}: {message}")]
    Arity { command: String, message: String },

    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error("{0}")]
    Failed(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command was cancelled")]
    Cancelled,
}

impl CommandError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Output captured from a single run.
///
/// Error-stream text is kept separately from `result`: a command may write
/// warnings and still succeed.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub result: Result<(), CommandError>,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            result: Ok(()),
        }
    }

    pub fn failure(stdout: impl Into<String>, stderr: impl Into<String>, error: CommandError) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            result: Err(error),
        }
    }
}

/// Per-invocation context handed to [`Command::run_with_output`].
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub command_id: CommandId,
    pub cancellation: CancellationToken,
}

impl ExecutionContext {
    pub fn new(command_id: CommandId, cancellation: CancellationToken) -> Self {
        Self { command_id, cancellation }
    }
}

/// A single named operation with flags and positional arguments.
///
/// Instances are single-use: the adapter constructs one per invocation,
/// lets it declare its flags, initializes it and runs it once.
#[async_trait]
pub trait Command: Send {
    fn name(&self) -> &str;

    fn info(&self) -> CommandInfo;

    /// Declare the command's flags into `flags`.
    fn set_flags(&self, flags: &mut FlagSet);

    /// Receive the parsed flags and positional arguments.
    fn init(&mut self, flags: &FlagSet, args: Vec<String>) -> Result<(), CommandError>;

    /// Run the command. Implementations should observe `ctx.cancellation`.
    async fn run_with_output(&mut self, ctx: &ExecutionContext) -> CommandOutput;
}

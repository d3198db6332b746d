use cmdbridge_registry::{CommandError, ExecutionContext};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::binder::BoundCommand;
use super::errors::AdapterError;

/// Run a bound command and combine its output streams.
///
/// Error-stream text is appended after a newline when non-empty; only the
/// command's own error makes the run fail. Cancellation abandons the run.
pub async fn run(bound: BoundCommand, cancellation: CancellationToken) -> Result<String, AdapterError> {
    let BoundCommand { id, mut command, .. } = bound;
    let ctx = ExecutionContext::new(id.clone(), cancellation.clone());
    debug!(command = %id, "executing command");

    let output = tokio::select! {
        biased;
        _ = cancellation.cancelled() => {
            return Err(AdapterError::Cancelled { command: id.to_string() });
        }
        output = command.run_with_output(&ctx) => output,
    };

    match output.result {
        Ok(()) => Ok(combine(output.stdout, &output.stderr)),
        Err(CommandError::Cancelled) => Err(AdapterError::Cancelled { command: id.to_string() }),
        Err(error) => {
            warn!(command = %id, %error, "command failed");
            Err(AdapterError::ExecutionFailed {
                command: id.to_string(),
                message: error.to_string(),
                stderr: output.stderr,
            })
        }
    }
}

fn combine(mut stdout: String, stderr: &str) -> String {
    if !stderr.is_empty() {
        stdout.push('\n');
        stdout.push_str(stderr);
    }
    stdout
}

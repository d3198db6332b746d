//! Structured protocol errors for adapter failures.

use chrono::Utc;
use rmcp::model::{CallToolResult, Content, ErrorData};
use serde_json::{Value, json};

use crate::adapter::AdapterError;

fn build_error_data(error_code: &str, category: &str, message: &str, context: Value, retryable: bool, suggested_action: &str) -> Value {
    json!({
        "error_code": error_code,
        "category": category,
        "message": message,
        "context": context,
        "retryable": retryable,
        "suggested_action": suggested_action,
        "correlation_id": format!("cmdbridge-{}", Utc::now().timestamp_millis()),
    })
}

/// Convert an adapter error into a protocol error with a structured payload.
pub fn to_error_data(error: &AdapterError) -> ErrorData {
    let message = error.to_string();
    match error {
        AdapterError::UnknownCommand { command } => ErrorData::resource_not_found(
            message.clone(),
            Some(build_error_data(
                "UNKNOWN_COMMAND",
                "not_found",
                &message,
                json!({ "command": command }),
                false,
                "List the available tools and retry with one of their names.",
            )),
        ),
        AdapterError::UnknownResource { uri } => ErrorData::resource_not_found(
            message.clone(),
            Some(build_error_data(
                "UNKNOWN_RESOURCE",
                "not_found",
                &message,
                json!({ "uri": uri }),
                false,
                "List resources and resource templates to find a valid URI.",
            )),
        ),
        AdapterError::InvalidArgument { command, flag, .. } => ErrorData::invalid_params(
            message.clone(),
            Some(build_error_data(
                "INVALID_ARGUMENT",
                "validation",
                &message,
                json!({ "command": command, "flag": flag }),
                false,
                "Check the tool's input schema and correct the named argument.",
            )),
        ),
        AdapterError::ExecutionFailed { command, stderr, .. } => ErrorData::internal_error(
            message.clone(),
            Some(build_error_data(
                "EXECUTION_FAILED",
                "execution",
                &message,
                json!({ "command": command, "stderr": stderr }),
                false,
                "Inspect the command's error output; the command is not retried automatically.",
            )),
        ),
        AdapterError::InternalConfiguration { command, .. } => ErrorData::internal_error(
            message.clone(),
            Some(build_error_data(
                "INTERNAL_CONFIGURATION",
                "internal",
                &message,
                json!({ "command": command }),
                false,
                "Fix the command catalog; this cannot be resolved by changing the request.",
            )),
        ),
        AdapterError::Cancelled { command } => ErrorData::internal_error(
            message.clone(),
            Some(build_error_data(
                "CANCELLED",
                "execution",
                &message,
                json!({ "command": command }),
                false,
                "Re-issue the request if the command should still run.",
            )),
        ),
    }
}

/// Map a tool-call outcome: command failures become error results carrying
/// the captured error output, everything else is a protocol error.
pub fn tool_result(outcome: Result<String, AdapterError>) -> Result<CallToolResult, ErrorData> {
    match outcome {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(error) => match &error {
            AdapterError::ExecutionFailed { stderr, .. } => {
                let mut contents = vec![Content::text(error.to_string())];
                if !stderr.is_empty() {
                    contents.push(Content::text(stderr.clone()));
                }
                Ok(CallToolResult::error(contents))
            }
            _ => Err(to_error_data(&error)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn invalid_argument_is_invalid_params_with_flag_context() {
        let error = AdapterError::invalid_argument("deploy", Some("num-units".into()), "bad value");
        let data = to_error_data(&error);
        assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
        let payload = data.data.expect("payload");
        assert_eq!(payload["error_code"], "INVALID_ARGUMENT");
        assert_eq!(payload["context"]["flag"], "num-units");
        assert_eq!(payload["retryable"], false);
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let data = to_error_data(&AdapterError::unknown_resource("juju://nope"));
        assert_eq!(data.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[test]
    fn execution_failure_becomes_error_result_with_stderr() {
        let result = tool_result(Err(AdapterError::ExecutionFailed {
            command: "status".into(),
            message: "status exited with 1".into(),
            stderr: "ERROR no controller".into(),
        }))
        .expect("tool result");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 2);
        let summary = serde_json::to_value(&result.content[0]).expect("content json");
        assert_eq!(summary["text"], "status failed: status exited with 1");
        let stderr = serde_json::to_value(&result.content[1]).expect("content json");
        assert_eq!(stderr["text"], "ERROR no controller");
    }

    #[test]
    fn internal_configuration_is_a_protocol_error() {
        let error = tool_result(Err(AdapterError::internal("config", "bad index"))).unwrap_err();
        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
    }
}

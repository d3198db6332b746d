#![cfg(unix)]

use std::io::Write;

use cmdbridge_mcp::{Adapter, AdapterError};
use cmdbridge_registry::{CatalogSource, load_catalog_manifest};
use cmdbridge_types::TransportMode;
use rmcp::model::ResourceContents;
use serde_json::json;
use tokio_util::sync::CancellationToken;

// `sh -c <script> <id> <argv...>`: the command id becomes $0 and the rendered
// flags and arguments become $@.
const MANIFEST: &str = r#"
scheme: demo
program: sh
program_args: ["-c", 'echo "$0 $*"; if [ "$0" = fail ]; then echo broken >&2; exit 2; fi']
commands:
  - id: greet
    purpose: Print a greeting.
    args: "<name>"
    max_args: 1
    flags:
      - { name: loud, type: bool, usage: Shout }
      - { name: times, type: int, default: "1", usage: Repeat count }
      - { name: wipe, type: bool, usage: Dangerous }
    disabled_args:
      http: [wipe]
  - id: fail
    purpose: Always fails.
resource_templates:
  - uri_template: "demo://greet-doc/{name}"
    name: greeting
    command_id: greet
    fixed_flags: { loud: "true" }
    uri_to_args: { name: "0" }
"#;

fn adapter() -> Adapter {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("temp manifest");
    file.write_all(MANIFEST.as_bytes()).expect("write manifest");
    let manifest = load_catalog_manifest(&CatalogSource::File(file.path().to_path_buf())).expect("manifest loads");
    Adapter::from_manifest(&manifest, TransportMode::Http).expect("adapter")
}

#[tokio::test]
async fn tool_call_runs_the_program() {
    let adapter = adapter();
    let output = adapter
        .call_tool(
            "greet",
            json!({ "args": ["world"], "loud": true, "times": 2, "wipe": true }).as_object().cloned(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(output, "greet --loud --times=2 world\n");
}

#[tokio::test]
async fn template_read_pins_fixed_flags() {
    let adapter = adapter();
    let result = adapter
        .read_resource("demo://greet-doc/moon", CancellationToken::new())
        .await
        .unwrap();
    match &result.contents[0] {
        ResourceContents::TextResourceContents { text, .. } => assert_eq!(text, "greet --loud moon\n"),
        other => panic!("unexpected contents {other:?}"),
    }
}

#[tokio::test]
async fn failing_program_surfaces_stderr() {
    let adapter = adapter();
    let error = adapter.call_tool("fail", None, CancellationToken::new()).await.unwrap_err();
    match error {
        AdapterError::ExecutionFailed { command, stderr, .. } => {
            assert_eq!(command, "fail");
            assert_eq!(stderr, "broken\n");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn manifest_schema_respects_disabled_args() {
    let adapter = adapter();
    let names: Vec<String> = adapter.schema("greet").unwrap().names().map(String::from).collect();
    assert_eq!(names, vec!["args", "loud", "times"]);
}

#[tokio::test]
async fn arity_violation_is_invalid_argument() {
    let adapter = adapter();
    let error = adapter
        .call_tool("greet", json!({ "args": ["a", "b"] }).as_object().cloned(), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(error, AdapterError::InvalidArgument { .. }), "{error:?}");
}

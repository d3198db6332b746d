#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cmdbridge_mcp::Adapter;
use cmdbridge_registry::{CatalogEntry, Command, CommandCatalog, CommandError, CommandOutput, ExecutionContext, FlagSet};
use cmdbridge_types::{CommandDefinition, CommandInfo, ResourceTemplateConfig, TransportMode};

/// Echoes its flag state and positional arguments.
pub struct Recorder {
    id: &'static str,
    info: CommandInfo,
    declare: fn(&mut FlagSet),
    max_args: Option<usize>,
    line: String,
}

impl Recorder {
    fn new(id: &'static str, purpose: &str, declare: fn(&mut FlagSet), max_args: Option<usize>) -> Self {
        Self {
            id,
            info: CommandInfo {
                name: id.to_string(),
                purpose: purpose.to_string(),
                ..CommandInfo::default()
            },
            declare,
            max_args,
            line: String::new(),
        }
    }
}

#[async_trait]
impl Command for Recorder {
    fn name(&self) -> &str {
        self.id
    }

    fn info(&self) -> CommandInfo {
        self.info.clone()
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        (self.declare)(flags);
    }

    fn init(&mut self, flags: &FlagSet, args: Vec<String>) -> Result<(), CommandError> {
        if let Some(max) = self.max_args
            && args.len() > max
        {
            return Err(CommandError::Arity {
                command: self.id.to_string(),
                message: format!("expected at most {max} argument(s)"),
            });
        }
        let state: Vec<String> = flags.state().into_iter().map(|(name, value)| format!("{name}={value}")).collect();
        self.line = format!("{} [{}] {:?}", self.id, state.join(" "), args);
        Ok(())
    }

    async fn run_with_output(&mut self, _ctx: &ExecutionContext) -> CommandOutput {
        CommandOutput::success(self.line.clone(), "")
    }
}

/// Succeeds but writes a warning to the error stream.
pub struct Noisy;

#[async_trait]
impl Command for Noisy {
    fn name(&self) -> &str {
        "noisy"
    }

    fn info(&self) -> CommandInfo {
        CommandInfo::default()
    }

    fn set_flags(&self, _flags: &mut FlagSet) {}

    fn init(&mut self, _flags: &FlagSet, _args: Vec<String>) -> Result<(), CommandError> {
        Ok(())
    }

    async fn run_with_output(&mut self, _ctx: &ExecutionContext) -> CommandOutput {
        CommandOutput::success("result", "warning: deprecated")
    }
}

/// Always fails with captured error output.
pub struct Failing;

#[async_trait]
impl Command for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn info(&self) -> CommandInfo {
        CommandInfo::default()
    }

    fn set_flags(&self, _flags: &mut FlagSet) {}

    fn init(&mut self, _flags: &FlagSet, _args: Vec<String>) -> Result<(), CommandError> {
        Ok(())
    }

    async fn run_with_output(&mut self, _ctx: &ExecutionContext) -> CommandOutput {
        CommandOutput::failure("", "ERROR controller not found", CommandError::failed("exit status 1"))
    }
}

/// Never finishes on its own.
pub struct Stuck;

#[async_trait]
impl Command for Stuck {
    fn name(&self) -> &str {
        "stuck"
    }

    fn info(&self) -> CommandInfo {
        CommandInfo::default()
    }

    fn set_flags(&self, _flags: &mut FlagSet) {}

    fn init(&mut self, _flags: &FlagSet, _args: Vec<String>) -> Result<(), CommandError> {
        Ok(())
    }

    async fn run_with_output(&mut self, _ctx: &ExecutionContext) -> CommandOutput {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        CommandOutput::success("", "")
    }
}

fn no_flags(_: &mut FlagSet) {}

fn bootstrap_flags(flags: &mut FlagSet) {
    flags
        .bool_flag("force", false, "Allow the bypassing of checks")
        .string_flag("config", "", "Controller configuration")
        .int_flag("bootstrap-timeout", 1200, "Seconds to wait");
}

fn deploy_flags(flags: &mut FlagSet) {
    flags
        .bool_flag("trust", false, "Trust the charm")
        .int_flag("num-units", 1, "Number of units")
        .float_flag("ratio", 0.5, "Placement ratio")
        .string_flag("channel", "stable", "Charm channel")
        .declare(cmdbridge_types::FlagDescriptor::new(
            "timeout",
            cmdbridge_types::FlagKind::Int,
            "10m",
            "How long to wait",
        ));
}

fn config_flags(flags: &mut FlagSet) {
    flags
        .string_flag("format", "tabular", "Output format")
        .string_flag("model", "", "Model to operate in");
}

pub fn catalog() -> CommandCatalog {
    let status = CatalogEntry::new(CommandDefinition::new("status"), || {
        Box::new(Recorder::new("status", "Report status.", no_flags, None))
    });
    let bootstrap = CatalogEntry::new(
        CommandDefinition::new("bootstrap")
            .with_disabled(TransportMode::Http, ["force", "config"])
            .with_disabled(TransportMode::Stdio, ["force"]),
        || Box::new(Recorder::new("bootstrap", "Initializes a cloud environment.", bootstrap_flags, Some(2))),
    );
    let deploy = CatalogEntry::new(CommandDefinition::new("deploy"), || {
        Box::new(Recorder::new("deploy", "Deploy an application.", deploy_flags, Some(2)))
    });
    let config = CatalogEntry::new(CommandDefinition::new("config"), || {
        Box::new(Recorder::new("config", "Get or set application config.", config_flags, None))
    });
    CommandCatalog::builder()
        .register(status)
        .register(bootstrap)
        .register(deploy)
        .register(config)
        .register(CatalogEntry::new(CommandDefinition::new("noisy"), || Box::new(Noisy)))
        .register(CatalogEntry::new(CommandDefinition::new("failing"), || Box::new(Failing)))
        .register(CatalogEntry::new(CommandDefinition::new("stuck"), || Box::new(Stuck)))
        .build()
        .expect("test catalog")
}

pub fn template(uri_template: &str, name: &str, command: &str, args: &[(&str, &str)], flags: &[(&str, &str)]) -> ResourceTemplateConfig {
    ResourceTemplateConfig {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        description: String::new(),
        mime_type: Some("text/plain".into()),
        command_id: command.into(),
        fixed_flags: Default::default(),
        uri_to_args: args.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        uri_to_flags: flags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    }
}

pub fn adapter(transport: TransportMode, templates: Vec<ResourceTemplateConfig>) -> Adapter {
    Adapter::new(Arc::new(catalog()), transport, "juju", templates).expect("adapter")
}

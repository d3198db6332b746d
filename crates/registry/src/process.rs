//! Commands backed by an external program.
//!
//! A [`ProcessCommand`] runs `program [program_args] <id> --flag=value ... [--] args...`
//! and captures both output streams. Its flags and documentation come from a
//! [`CatalogManifest`], so any CLI can be exposed without per-command code.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use cmdbridge_types::{CatalogManifest, CommandInfo, CommandManifest, FlagKind};
use tokio::process::Command as ProcessBuilder;
use tracing::debug;

use crate::catalog::{CatalogEntry, CatalogError, CommandCatalog};
use crate::command::{Command, CommandError, CommandOutput, ExecutionContext};
use crate::flags::FlagSet;

/// Executable shared by every command of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessProgram {
    pub program: String,
    pub program_args: Vec<String>,
}

#[derive(Debug)]
pub struct ProcessCommand {
    program: Arc<ProcessProgram>,
    manifest: Arc<CommandManifest>,
    flag_args: Vec<String>,
    args: Vec<String>,
}

impl ProcessCommand {
    pub fn new(program: Arc<ProcessProgram>, manifest: Arc<CommandManifest>) -> Self {
        Self {
            program,
            manifest,
            flag_args: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Full argument vector passed to the program, excluding the program itself.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = self.program.program_args.clone();
        argv.push(self.manifest.id.to_string());
        argv.extend(self.flag_args.iter().cloned());
        if self.args.iter().any(|arg| arg.starts_with('-')) {
            argv.push("--".to_string());
        }
        argv.extend(self.args.iter().cloned());
        argv
    }

    fn check_arity(&self, count: usize) -> Result<(), CommandError> {
        let id = self.manifest.id.to_string();
        if let Some(min) = self.manifest.min_args
            && count < min
        {
            return Err(CommandError::Arity {
                command: id,
                message: format!("expected at least {min} argument(s), got {count}"),
            });
        }
        if let Some(max) = self.manifest.max_args
            && count > max
        {
            return Err(CommandError::Arity {
                command: id,
                message: format!("expected at most {max} argument(s), got {count}: {:?}", &self.args),
            });
        }
        Ok(())
    }
}

fn render_flag(name: &str, kind: FlagKind, value: &str) -> String {
    match (kind, value) {
        (FlagKind::Bool, "true") => format!("--{name}"),
        _ => format!("--{name}={value}"),
    }
}

#[async_trait]
impl Command for ProcessCommand {
    fn name(&self) -> &str {
        self.manifest.id.as_str()
    }

    fn info(&self) -> CommandInfo {
        self.manifest.info()
    }

    fn set_flags(&self, flags: &mut FlagSet) {
        for flag in &self.manifest.flags {
            flags.declare(flag.descriptor());
        }
    }

    fn init(&mut self, flags: &FlagSet, args: Vec<String>) -> Result<(), CommandError> {
        self.args = args;
        self.check_arity(self.args.len())?;
        self.flag_args = flags
            .explicit_values()
            .map(|(descriptor, value)| render_flag(&descriptor.name, descriptor.kind, value))
            .collect();
        Ok(())
    }

    async fn run_with_output(&mut self, ctx: &ExecutionContext) -> CommandOutput {
        let argv = self.argv();
        debug!(program = %self.program.program, ?argv, "spawning command");
        let child = ProcessBuilder::new(&self.program.program)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(source) => {
                let error = CommandError::Spawn {
                    program: self.program.program.clone(),
                    source,
                };
                return CommandOutput::failure(String::new(), String::new(), error);
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => {
                CommandOutput::failure(String::new(), String::new(), CommandError::Cancelled)
            }
            output = child.wait_with_output() => match output {
                Ok(output) => {
                    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                    if output.status.success() {
                        CommandOutput::success(stdout, stderr)
                    } else {
                        let error = CommandError::failed(format!("{} exited with {}", self.manifest.id, output.status));
                        CommandOutput::failure(stdout, stderr, error)
                    }
                }
                Err(error) => CommandOutput::failure(String::new(), String::new(), CommandError::failed(error.to_string())),
            },
        }
    }
}

/// Build a catalog whose entries construct [`ProcessCommand`]s for `manifest`.
pub fn catalog_from_manifest(manifest: &CatalogManifest) -> Result<CommandCatalog, CatalogError> {
    let program = Arc::new(ProcessProgram {
        program: manifest.program.clone(),
        program_args: manifest.program_args.clone(),
    });
    let entries = manifest.commands.iter().map(|command| {
        let program = Arc::clone(&program);
        let command = Arc::new(command.clone());
        let definition = command.definition();
        CatalogEntry::new(definition, move || {
            Box::new(ProcessCommand::new(Arc::clone(&program), Arc::clone(&command))) as Box<dyn Command>
        })
    });
    CommandCatalog::builder().register_all(entries).build()
}

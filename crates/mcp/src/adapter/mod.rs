//! Command-to-tool adapter.
//!
//! Publishes every catalog command as a schema-described tool plus a
//! markdown documentation resource, and serves URI-templated reads by
//! mapping path segments onto the same positional/flag model used for tool
//! calls.

mod binder;
mod docs;
mod errors;
mod executor;
mod invocation;
mod resource_template;
mod schema;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use cmdbridge_registry::{Command, CommandCatalog, CommandFactory, FlagSet, ManifestError, catalog_from_manifest};
use cmdbridge_types::{CatalogManifest, CommandId, CommandInfo, ExecutionConfig, ParameterSchema, ResourceTemplateConfig, TransportMode};
use rmcp::model::{
    AnnotateAble, JsonObject, RawResource, RawResourceTemplate, ReadResourceResult, Resource, ResourceContents, ResourceTemplate, Tool,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use binder::{BoundCommand, bind, coerce};
pub use docs::{doc_resource_name, doc_resource_uri, render_markdown};
pub use errors::AdapterError;
pub use executor::run;
pub use invocation::InvocationRequest;
pub use resource_template::{resolve, uri_segments};
pub use schema::build_schema;

const MARKDOWN_MIME_TYPE: &str = "text/markdown";
const TEXT_MIME_TYPE: &str = "text/plain";

/// Exposes a command catalog as tools and resources for one transport.
#[derive(Debug)]
pub struct Adapter {
    factory: CommandFactory,
    transport: TransportMode,
    scheme: String,
    disabled: HashMap<CommandId, BTreeSet<String>>,
    templates: Vec<ResourceTemplateConfig>,
}

impl Adapter {
    /// Build an adapter, selecting each command's disabled arguments for `transport`.
    pub fn new(
        catalog: Arc<CommandCatalog>,
        transport: TransportMode,
        scheme: impl Into<String>,
        templates: Vec<ResourceTemplateConfig>,
    ) -> Result<Self, ManifestError> {
        let mut kinds = HashSet::new();
        for template in &templates {
            if !catalog.contains(template.command_id.as_str()) {
                return Err(ManifestError::Invalid(format!(
                    "resource template '{}' references unknown command '{}'",
                    template.name, template.command_id
                )));
            }
            let kind = template.resource_kind().ok_or_else(|| {
                ManifestError::Invalid(format!("resource template '{}' has no resource kind segment", template.name))
            })?;
            if !kinds.insert(kind.to_string()) {
                return Err(ManifestError::Invalid(format!("resource kind '{kind}' is served by more than one template")));
            }
        }

        let disabled = catalog
            .all_ids()
            .into_iter()
            .map(|id| {
                let names = catalog
                    .definition_of(id.as_str())
                    .map(|definition| definition.disabled_for(transport))
                    .unwrap_or_default();
                (id, names)
            })
            .collect();

        Ok(Self {
            factory: CommandFactory::new(catalog),
            transport,
            scheme: scheme.into(),
            disabled,
            templates,
        })
    }

    /// Build an adapter over process-backed commands declared in `manifest`.
    pub fn from_manifest(manifest: &CatalogManifest, transport: TransportMode) -> Result<Self> {
        let catalog = catalog_from_manifest(manifest)?;
        let adapter = Self::new(Arc::new(catalog), transport, manifest.scheme.clone(), manifest.resource_templates.clone())?;
        Ok(adapter)
    }

    pub fn transport_mode(&self) -> TransportMode {
        self.transport
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn tool_names(&self) -> Vec<CommandId> {
        self.factory.catalog().all_ids()
    }

    pub fn disabled_args(&self, id: &str) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.disabled.get(id).unwrap_or(&EMPTY)
    }

    fn create(&self, id: &str) -> Result<Box<dyn Command>, AdapterError> {
        self.factory.create(id).map_err(|_| AdapterError::unknown_command(id))
    }

    pub fn schema(&self, id: &str) -> Result<ParameterSchema, AdapterError> {
        let command = self.create(id)?;
        Ok(build_schema(command.as_ref(), self.disabled_args(id)))
    }

    pub fn tool(&self, id: &str) -> Result<Tool, AdapterError> {
        let command = self.create(id)?;
        let schema = build_schema(command.as_ref(), self.disabled_args(id));
        let input_schema: JsonObject = schema.to_json_schema();
        Ok(Tool::new(id.to_string(), tool_description(id, &command.info()), Arc::new(input_schema)))
    }

    pub fn tools(&self) -> Result<Vec<Tool>, AdapterError> {
        self.tool_names()
            .iter()
            .map(|id| {
                debug!(tool = %id, "publishing tool");
                self.tool(id.as_str())
            })
            .collect()
    }

    /// Invoke tool `id` with the caller's argument object.
    pub async fn call_tool(
        &self,
        id: &str,
        arguments: Option<JsonObject>,
        cancellation: CancellationToken,
    ) -> Result<String, AdapterError> {
        let request = InvocationRequest::from_arguments(arguments);
        let mut config = ExecutionConfig::new(id);
        config.flag_values = request.named;
        config.positional_args = request.positional;
        self.execute(config, cancellation).await
    }

    /// Construct, bind and run the command an execution config describes.
    pub async fn execute(&self, config: ExecutionConfig, cancellation: CancellationToken) -> Result<String, AdapterError> {
        let id = config.command_id;
        let command = self.create(id.as_str())?;
        let bound = bind(
            command,
            &id,
            self.disabled_args(id.as_str()),
            &config.fixed_flags,
            &config.flag_values,
            config.positional_args,
        )?;
        run(bound, cancellation).await
    }

    pub fn doc_resources(&self) -> Result<Vec<Resource>, AdapterError> {
        self.tool_names()
            .iter()
            .map(|id| {
                let info = self.create(id.as_str())?.info();
                debug!(resource = %doc_resource_name(id.as_str()), "publishing documentation resource");
                Ok(RawResource {
                    uri: doc_resource_uri(&self.scheme, id.as_str()),
                    name: doc_resource_name(id.as_str()),
                    title: Some(format!("{id} documentation")),
                    description: (!info.purpose.is_empty()).then(|| info.purpose.clone()),
                    mime_type: Some(MARKDOWN_MIME_TYPE.to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                }
                .no_annotation())
            })
            .collect()
    }

    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates
            .iter()
            .map(|template| {
                debug!(template = %template.name, command = %template.command_id, "publishing resource template");
                RawResourceTemplate {
                    uri_template: template.uri_template.clone(),
                    name: template.name.clone(),
                    title: None,
                    description: (!template.description.is_empty()).then(|| template.description.clone()),
                    mime_type: template.mime_type.clone(),
                    icons: None,
                }
                .no_annotation()
            })
            .collect()
    }

    /// Serve a documentation resource or a templated read.
    pub async fn read_resource(&self, uri: &str, cancellation: CancellationToken) -> Result<ReadResourceResult, AdapterError> {
        if let Some(id) = self.doc_command_for(uri) {
            let info = self.create(id.as_str())?.info();
            return Ok(text_resource(uri, MARKDOWN_MIME_TYPE, render_markdown(id.as_str(), &info)));
        }

        let template = self.template_for(uri).ok_or_else(|| AdapterError::unknown_resource(uri))?;
        let config = resolve(uri, template)?;
        self.check_template_flags(template)?;
        let text = self.execute(config, cancellation).await?;
        let mime_type = template.mime_type.as_deref().unwrap_or(TEXT_MIME_TYPE);
        Ok(text_resource(uri, mime_type, text))
    }

    fn doc_command_for(&self, uri: &str) -> Option<CommandId> {
        let rest = uri.strip_prefix(&self.scheme)?.strip_prefix("://")?;
        let id = rest.strip_suffix(docs::DOC_SUFFIX)?;
        self.factory.catalog().contains(id).then(|| CommandId::from(id))
    }

    fn template_for(&self, uri: &str) -> Option<&ResourceTemplateConfig> {
        let rest = uri.strip_prefix(&self.scheme)?.strip_prefix("://")?;
        let kind = rest.split(['/', '?', '#']).next()?;
        self.templates.iter().find(|template| template.resource_kind() == Some(kind))
    }

    fn check_template_flags(&self, template: &ResourceTemplateConfig) -> Result<(), AdapterError> {
        let command = self.create(template.command_id.as_str())?;
        let mut flags = FlagSet::new(template.command_id.as_str());
        command.set_flags(&mut flags);
        match template.uri_to_flags.values().find(|flag| !flags.contains(flag)) {
            Some(flag) => Err(AdapterError::internal(
                template.command_id.as_str(),
                format!("template '{}' maps to undeclared flag '{flag}'", template.name),
            )),
            None => Ok(()),
        }
    }
}

fn tool_description(id: &str, info: &CommandInfo) -> String {
    let purpose = info.purpose.trim();
    let args = info.args.trim();
    match (purpose.is_empty(), args.is_empty()) {
        (_, true) => purpose.to_string(),
        (true, false) => format!("Usage: {id} {args}"),
        (false, false) => format!("{purpose}\n\nUsage: {id} {args}"),
    }
}

fn text_resource(uri: &str, mime_type: &str, text: String) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(mime_type.to_string()),
            text,
            meta: None,
        }],
    }
}

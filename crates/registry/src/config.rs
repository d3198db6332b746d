use std::{
    collections::HashSet,
    env,
    path::{Path, PathBuf},
};

use cmdbridge_types::CatalogManifest;
use dirs_next::{config_dir, home_dir};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable overriding the catalog manifest location.
pub const CATALOG_PATH_ENV: &str = "CMDBRIDGE_CATALOG_PATH";

const EMBEDDED_CATALOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../catalogs/default.yaml"));

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Where the active catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => f.write_str("<embedded>"),
        }
    }
}

/// Get the default path for the catalog manifest.
pub fn default_catalog_path() -> PathBuf {
    if let Ok(path) = env::var(CATALOG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cmdbridge")
        .join("catalog.yaml")
}

/// Pick the catalog to load: an explicit path, then the environment
/// override, then the per-user file if it exists, then the embedded catalog.
pub fn resolve_catalog_source(explicit: Option<&str>) -> CatalogSource {
    if let Some(path) = explicit.map(str::trim).filter(|path| !path.is_empty()) {
        return CatalogSource::File(expand_tilde(path));
    }
    if env::var(CATALOG_PATH_ENV).is_ok_and(|path| !path.trim().is_empty()) {
        return CatalogSource::File(default_catalog_path());
    }
    let user_path = default_catalog_path();
    if user_path.is_file() {
        return CatalogSource::File(user_path);
    }
    CatalogSource::Embedded
}

pub fn load_catalog_manifest(source: &CatalogSource) -> Result<CatalogManifest, ManifestError> {
    let manifest = match source {
        CatalogSource::File(path) => read_manifest(path)?,
        CatalogSource::Embedded => parse_manifest(EMBEDDED_CATALOG, "<embedded>", false)?,
    };
    validate_manifest(&manifest)?;
    info!(source = %source, commands = manifest.commands.len(), "loaded command catalog");
    Ok(manifest)
}

fn read_manifest(path: &Path) -> Result<CatalogManifest, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    parse_manifest(&content, &path.display().to_string(), is_json)
}

fn parse_manifest(content: &str, origin: &str, is_json: bool) -> Result<CatalogManifest, ManifestError> {
    let parsed = if is_json {
        serde_json::from_str(content).map_err(|error| error.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|error| error.to_string())
    };
    parsed.map_err(|message| ManifestError::Parse {
        origin: origin.to_string(),
        message,
    })
}

/// Check cross references the type system cannot express.
pub fn validate_manifest(manifest: &CatalogManifest) -> Result<(), ManifestError> {
    if manifest.program.trim().is_empty() {
        return Err(ManifestError::Invalid("'program' must not be empty".into()));
    }
    if manifest.scheme.is_empty() || !manifest.scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return Err(ManifestError::Invalid(format!("'{}' is not a valid URI scheme", manifest.scheme)));
    }
    let ids: HashSet<&str> = manifest.commands.iter().map(|command| command.id.as_str()).collect();
    for template in &manifest.resource_templates {
        if !ids.contains(template.command_id.as_str()) {
            return Err(ManifestError::Invalid(format!(
                "resource template '{}' references unknown command '{}'",
                template.name, template.command_id
            )));
        }
        debug!(template = %template.name, command = %template.command_id, "validated resource template");
    }
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

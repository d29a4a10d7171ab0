//! Base/override document loading with environment selection.
//!
//! Reads `config.yaml`, picks the active environment (external override
//! first, then the base document's `env` field), merges the matching
//! `config_<env>.yaml` if it exists, and decodes a `ResolvedConfig`.

mod layer_io;
mod merge;
mod schema;

#[cfg(test)]
mod tests;

pub use merge::merge;

pub(crate) use layer_io::parse_document;

use crate::{ConfigError, ResolvedConfig};
use log::{debug, info};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Default directory holding the config documents.
pub const DEFAULT_CONFIG_DIR: &str = "configs";
/// Default base document file name.
pub const BASE_CONFIG_FILE: &str = "config.yaml";
/// Environment variable selecting the active environment.
pub const ENV_VAR: &str = "UI_AUTOMATION_ENV";
/// Environment identifier that never loads an override document.
pub const DEFAULT_ENV: &str = "default";

/// Role of a document in the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    /// Shared defaults for every environment.
    Base,
    /// Environment-specific diff applied on top of the base.
    Override,
}

impl DocumentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Override => "override",
        }
    }
}

/// Metadata about a document that contributed to the resolved config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub source: DocumentSource,
    pub path: PathBuf,
}

/// Options controlling where documents are read from and which environment is active.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Directory containing the base and override documents.
    pub config_dir: PathBuf,
    /// Base document file name; override names are derived from it.
    pub base_file: String,
    /// External environment selection, taking precedence over the base `env` field.
    pub env_override: Option<String>,
}

impl ResolverOptions {
    /// Options for `config_dir`, honoring `UI_AUTOMATION_ENV`.
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        let env_override = env_override_from(std::env::var(ENV_VAR).ok());
        if let Some(env) = env_override.as_deref() {
            debug!("environment override from {ENV_VAR}: {env}");
        }
        Self {
            env_override,
            ..Self::without_env(config_dir)
        }
    }

    /// Options for `config_dir` that ignore the process environment.
    pub fn without_env(config_dir: impl AsRef<Path>) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            base_file: BASE_CONFIG_FILE.to_string(),
            env_override: None,
        }
    }

    /// Force the active environment regardless of the base document.
    pub fn with_env_override(mut self, env: impl Into<String>) -> Self {
        self.env_override = env_override_from(Some(env.into()));
        self
    }

    /// Use a different base document file name.
    pub fn with_base_file(mut self, base_file: impl Into<String>) -> Self {
        self.base_file = base_file.into();
        self
    }

    pub fn base_path(&self) -> PathBuf {
        self.config_dir.join(&self.base_file)
    }

    pub fn override_path(&self, env: &str) -> PathBuf {
        self.config_dir
            .join(override_file_name(&self.base_file, env))
    }
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}

/// Override file name for `env`, e.g. `config.yaml` + `test` -> `config_test.yaml`.
pub fn override_file_name(base_file: &str, env: &str) -> String {
    let path = Path::new(base_file);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(base_file);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}_{env}.{ext}"),
        None => format!("{stem}_{env}"),
    }
}

/// Normalize an externally supplied environment value; blank means unset.
pub fn env_override_from(value: Option<String>) -> Option<String> {
    value
        .map(|env| env.trim().to_string())
        .filter(|env| !env.is_empty())
}

/// Pick the active environment: external override first, then the base `env` field.
pub fn select_env(env_override: Option<&str>, base: &Value) -> Option<String> {
    env_override
        .map(str::trim)
        .filter(|env| !env.is_empty())
        .map(str::to_string)
        .or_else(|| {
            base.get("env")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|env| !env.is_empty())
                .map(str::to_string)
        })
}

/// Reject identifiers that would resolve an override outside the config directory.
fn validate_env(env: &str) -> Result<(), ConfigError> {
    if env.contains(['/', '\\']) {
        return Err(ConfigError::InvalidEnv {
            env: env.to_string(),
        });
    }
    Ok(())
}

/// Load, merge and decode the configuration described by `options`.
///
/// A missing base document is fatal; a missing override document is not.
pub fn load(options: &ResolverOptions) -> Result<ResolvedConfig, ConfigError> {
    let base_path = options.base_path();
    info!("loading base config: {}", base_path.display());
    let mut document = layer_io::load_required_document(DocumentSource::Base, &base_path)?;
    let mut sources = vec![LoadedDocument {
        source: DocumentSource::Base,
        path: base_path,
    }];

    let env = select_env(options.env_override.as_deref(), &document);
    match env.as_deref() {
        Some(env) if env != DEFAULT_ENV => {
            validate_env(env)?;
            let path = options.override_path(env);
            if let Some(overlay) =
                layer_io::load_optional_document(DocumentSource::Override, &path)?
            {
                debug!("merging override config (env={env}, path={})", path.display());
                document = merge(&document, &overlay);
                sources.push(LoadedDocument {
                    source: DocumentSource::Override,
                    path,
                });
            }
        }
        Some(_) => debug!("default environment selected; no override document"),
        None => debug!("no environment selected; using base config only"),
    }

    if let (Some(env), Some(map)) = (env.as_deref(), document.as_mapping_mut()) {
        map.insert(
            Value::String("env".to_string()),
            Value::String(env.to_string()),
        );
    }

    let config = ResolvedConfig::from_document(document, sources)?;
    info!(
        "config resolved (env={}, documents={})",
        config.env,
        config.sources.len()
    );
    Ok(config)
}

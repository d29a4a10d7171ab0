//! Error types for config loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base document does not exist.
    #[error("base config not found: {}", path.display())]
    Missing { path: PathBuf },
    /// Reading a config file failed for a reason other than absence.
    #[error("failed to read {document} config {}: {source}", path.display())]
    ReadFailed {
        document: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A document is not valid YAML.
    #[error("failed to parse {document} config {}: {source}", path.display())]
    Parse {
        document: &'static str,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// The selected environment cannot name an override file.
    #[error("invalid environment identifier '{env}': must not contain path separators")]
    InvalidEnv { env: String },
    /// A document or field has the wrong shape.
    #[error("invalid {document} config at {path}: {message}")]
    Schema {
        document: String,
        path: String,
        message: String,
    },
}

impl ConfigError {
    /// True when the error came from a malformed or mis-shaped document.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Schema { .. })
    }
}

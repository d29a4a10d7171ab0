//! Layered YAML configuration for UI automation runs.
//!
//! A base document (`config.yaml`) is merged with an optional
//! environment-specific override (`config_<env>.yaml`). The merged result is
//! decoded into typed sections and cached by a [`ConfigResolver`] that callers
//! construct and pass around explicitly.

mod error;
mod loader;
mod model;
mod resolver;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Document loading, environment selection and merge helpers.
pub use loader::{
    BASE_CONFIG_FILE, DEFAULT_CONFIG_DIR, DEFAULT_ENV, DocumentSource, ENV_VAR, LoadedDocument,
    ResolverOptions, env_override_from, load, merge, override_file_name, select_env,
};
/// Configuration schema models.
pub use model::*;
/// Cached, concurrency-safe resolver.
pub use resolver::ConfigResolver;

//! Lazily resolved, cached configuration.

use crate::loader::{self, DEFAULT_CONFIG_DIR, ResolverOptions};
use crate::{ConfigError, ResolvedConfig};
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

/// Resolves configuration on first use and hands out the same `Arc` afterwards.
///
/// Concurrent first callers block on the internal lock until the single
/// in-flight resolution finishes. A failed resolution caches nothing, so the
/// next call starts over.
#[derive(Debug)]
pub struct ConfigResolver {
    options: ResolverOptions,
    cached: Mutex<Option<Arc<ResolvedConfig>>>,
}

impl ConfigResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            cached: Mutex::new(None),
        }
    }

    /// A resolver that always returns `config` and never touches the filesystem.
    pub fn with_config(config: ResolvedConfig) -> Self {
        Self {
            options: ResolverOptions::without_env(DEFAULT_CONFIG_DIR),
            cached: Mutex::new(Some(Arc::new(config))),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Return the cached config, resolving it first if needed.
    pub fn resolve(&self) -> Result<Arc<ResolvedConfig>, ConfigError> {
        let mut cached = self.cached.lock();
        if let Some(config) = cached.as_ref() {
            return Ok(Arc::clone(config));
        }
        debug!(
            "resolving config (dir={})",
            self.options.config_dir.display()
        );
        let config = Arc::new(loader::load(&self.options)?);
        *cached = Some(Arc::clone(&config));
        Ok(config)
    }

    /// The cached config, if resolution already succeeded.
    pub fn cached(&self) -> Option<Arc<ResolvedConfig>> {
        self.cached.lock().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.cached.lock().is_some()
    }
}

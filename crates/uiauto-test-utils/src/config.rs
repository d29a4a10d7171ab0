//! On-disk and in-memory config fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uiauto_config::{BASE_CONFIG_FILE, ResolvedConfig, ResolverOptions, override_file_name};

/// Base document shaped like a real project config.
pub const SAMPLE_BASE_YAML: &str = r#"env: "dev"
app: { base_url: "http://example.com", login_path: "" }
browser: { type: "chromium", headless: false, slow_mo: 0 }
timeout: { short: 3000, medium: 5000, long: 10000 }
account: { username: "x", password: "x" }
report: { screenshot_dir: "reports/screenshots" }
"#;

/// Config built from [`SAMPLE_BASE_YAML`] without touching the filesystem.
pub fn sample_config() -> ResolvedConfig {
    ResolvedConfig::from_yaml_str(SAMPLE_BASE_YAML).expect("sample config")
}

/// Temporary config directory holding a base document and optional overrides.
pub struct ConfigFixture {
    dir: TempDir,
}

impl ConfigFixture {
    /// Empty config directory.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("tmp"),
        }
    }

    /// Config directory seeded with [`SAMPLE_BASE_YAML`].
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.write_base(SAMPLE_BASE_YAML);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_base(&self, contents: &str) -> PathBuf {
        self.write(BASE_CONFIG_FILE, contents)
    }

    pub fn write_override(&self, env: &str, contents: &str) -> PathBuf {
        self.write(&override_file_name(BASE_CONFIG_FILE, env), contents)
    }

    /// Resolver options for this directory, ignoring the process environment.
    pub fn options(&self) -> ResolverOptions {
        ResolverOptions::without_env(self.dir.path())
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write");
        path
    }
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}

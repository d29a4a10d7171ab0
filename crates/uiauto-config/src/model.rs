//! Configuration schema for UI automation runs.

use crate::ConfigError;
use crate::loader::{DEFAULT_ENV, LoadedDocument};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Placeholder written over secrets in display output.
pub const REDACTED: &str = "***";

/// Merged, read-only configuration shared by every consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Active environment identifier.
    pub env: String,
    pub app: AppConfig,
    pub browser: BrowserConfig,
    pub timeout: TimeoutConfig,
    pub account: AccountConfig,
    pub report: ReportConfig,
    pub api: ApiConfig,
    /// Merged raw document, including keys without a typed section.
    pub document: Value,
    /// Documents that contributed, base first.
    pub sources: Vec<LoadedDocument>,
}

/// Typed projection of the recognized top-level sections.
#[derive(Debug, Deserialize)]
struct Sections {
    #[serde(default)]
    env: Option<String>,
    #[serde(default)]
    app: AppConfig,
    #[serde(default)]
    browser: BrowserConfig,
    #[serde(default)]
    timeout: TimeoutConfig,
    #[serde(default)]
    account: AccountConfig,
    #[serde(default)]
    report: ReportConfig,
    #[serde(default)]
    api: ApiConfig,
}

impl ResolvedConfig {
    /// Decode the typed view of an already merged document.
    pub fn from_document(document: Value, sources: Vec<LoadedDocument>) -> Result<Self, ConfigError> {
        let sections: Sections =
            serde_yaml::from_value(document.clone()).map_err(|err| ConfigError::Schema {
                document: "resolved".to_string(),
                path: "root".to_string(),
                message: err.to_string(),
            })?;
        Ok(Self {
            env: sections
                .env
                .filter(|env| !env.is_empty())
                .unwrap_or_else(|| DEFAULT_ENV.to_string()),
            app: sections.app,
            browser: sections.browser,
            timeout: sections.timeout,
            account: sections.account,
            report: sections.report,
            api: sections.api,
            document,
            sources,
        })
    }

    /// Build a config from a single YAML document (no layering, no files).
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let document = crate::loader::parse_document("inline", &PathBuf::from("<inline>"), contents)?;
        Self::from_document(document, Vec::new())
    }

    /// Look up a value by dotted path, e.g. `app.base_url`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.document, |value, key| value.as_mapping()?.get(key))
    }

    /// Look up a string value by dotted path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Merged document with `account.password` masked.
    pub fn redacted_document(&self) -> Value {
        let mut document = self.document.clone();
        if let Some(account) = document
            .get_mut("account")
            .and_then(Value::as_mapping_mut)
        {
            if let Some(password) = account.get_mut("password") {
                *password = Value::String(REDACTED.to_string());
            }
        }
        document
    }
}

/// Application under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub login_path: String,
}

impl AppConfig {
    /// Absolute login URL built from the base URL and login path.
    pub fn login_url(&self) -> String {
        if self.login_path.is_empty() {
            return self.base_url.clone();
        }
        if self.login_path.starts_with("http://") || self.login_path.starts_with("https://") {
            return self.login_path.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.login_path.trim_start_matches('/')
        )
    }
}

/// Browser engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    /// Accepted names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["chromium", "firefox", "webkit"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Webkit => "webkit",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chromium" => Ok(Self::Chromium),
            "firefox" => Ok(Self::Firefox),
            "webkit" => Ok(Self::Webkit),
            other => Err(format!("unsupported browser type: {other}")),
        }
    }
}

impl TryFrom<String> for BrowserKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    #[serde(rename = "type")]
    pub kind: BrowserKind,
    pub headless: bool,
    /// Delay between browser operations in milliseconds.
    pub slow_mo: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            headless: true,
            slow_mo: 0,
        }
    }
}

/// Named timeout buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutBucket {
    Short,
    Medium,
    Long,
}

/// Timeout buckets in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub short: u64,
    pub medium: u64,
    pub long: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            short: 3000,
            medium: 5000,
            long: 10000,
        }
    }
}

impl TimeoutConfig {
    pub fn duration(&self, bucket: TimeoutBucket) -> Duration {
        let millis = match bucket {
            TimeoutBucket::Short => self.short,
            TimeoutBucket::Medium => self.medium,
            TimeoutBucket::Long => self.long,
        };
        Duration::from_millis(millis)
    }

    /// Default page/context timeout.
    pub fn default_timeout(&self) -> Duration {
        self.duration(TimeoutBucket::Medium)
    }
}

/// Login account used by the login flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
    /// Saved browser storage state for pre-authenticated pages.
    pub storage_state: PathBuf,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            storage_state: PathBuf::from("artifacts/storage_state.json"),
        }
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("storage_state", &self.storage_state)
            .finish()
    }
}

/// Output locations for logs and failure artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the HTML report is written to; attachments link relative to it.
    pub root: PathBuf,
    pub screenshot_dir: PathBuf,
    pub trace_dir: PathBuf,
    pub log_dir: PathBuf,
    pub video_dir: PathBuf,
    pub har_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("reports"),
            screenshot_dir: PathBuf::from("reports/screenshots"),
            trace_dir: PathBuf::from("reports/traces"),
            log_dir: PathBuf::from("reports/logs"),
            video_dir: PathBuf::from("reports/videos"),
            har_dir: PathBuf::from("reports/har"),
        }
    }
}

/// HTTP API settings; falls back to the app base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub default_headers: BTreeMap<String, String>,
}

//! Shape checks for YAML config documents.
//!
//! Unknown keys are accepted so environments can carry extra settings; the
//! recognized sections must have the types the typed model expects.

use crate::{BrowserKind, ConfigError};
use serde_yaml::{Mapping, Value};

/// Validate a single document (base, override or inline).
pub(super) fn validate_document(value: &Value, document: &str) -> Result<(), ConfigError> {
    let map = expect_mapping(value, document, "")?;
    for key in map.keys() {
        if key.as_str().is_none() {
            return Err(invalid_field(document, "", "expected string keys"));
        }
    }

    if let Some(value) = map.get("env") {
        expect_string(value, document, "env")?;
    }
    if let Some(value) = map.get("app") {
        validate_string_fields(value, document, "app", &["base_url", "login_path"])?;
    }
    if let Some(value) = map.get("browser") {
        validate_browser(value, document, "browser")?;
    }
    if let Some(value) = map.get("timeout") {
        validate_timeout(value, document, "timeout")?;
    }
    if let Some(value) = map.get("account") {
        validate_string_fields(
            value,
            document,
            "account",
            &["username", "password", "storage_state"],
        )?;
    }
    if let Some(value) = map.get("report") {
        validate_string_fields(
            value,
            document,
            "report",
            &[
                "root",
                "screenshot_dir",
                "trace_dir",
                "log_dir",
                "video_dir",
                "har_dir",
            ],
        )?;
    }
    if let Some(value) = map.get("api") {
        validate_api(value, document, "api")?;
    }

    Ok(())
}

/// Validate the "browser" block.
fn validate_browser(value: &Value, document: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_mapping(value, document, path)?;
    if let Some(value) = map.get("type") {
        let field = join_path(path, "type");
        let name = value
            .as_str()
            .ok_or_else(|| invalid_field(document, &field, "expected string"))?;
        if name.parse::<BrowserKind>().is_err() {
            return Err(invalid_field(
                document,
                &field,
                &format!("unsupported browser type '{name}', expected one of {}", BrowserKind::NAMES.join(", ")),
            ));
        }
    }
    if let Some(value) = map.get("headless") {
        expect_bool(value, document, &join_path(path, "headless"))?;
    }
    if let Some(value) = map.get("slow_mo") {
        expect_u64(value, document, &join_path(path, "slow_mo"))?;
    }
    Ok(())
}

/// Validate the "timeout" block; every bucket is a millisecond count.
fn validate_timeout(value: &Value, document: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_mapping(value, document, path)?;
    for (key, value) in map {
        let key = key.as_str().unwrap_or_default();
        expect_u64(value, document, &join_path(path, key))?;
    }
    Ok(())
}

/// Validate the "api" block.
fn validate_api(value: &Value, document: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_mapping(value, document, path)?;
    if let Some(value) = map.get("base_url") {
        if !value.is_null() {
            expect_string(value, document, &join_path(path, "base_url"))?;
        }
    }
    if let Some(value) = map.get("default_headers") {
        let headers_path = join_path(path, "default_headers");
        let headers = expect_mapping(value, document, &headers_path)?;
        for (name, value) in headers {
            let name = name
                .as_str()
                .ok_or_else(|| invalid_field(document, &headers_path, "expected string keys"))?;
            expect_string(value, document, &join_path(&headers_path, name))?;
        }
    }
    Ok(())
}

/// Validate that the listed keys of a mapping, when present, hold strings.
fn validate_string_fields(
    value: &Value,
    document: &str,
    path: &str,
    fields: &[&str],
) -> Result<(), ConfigError> {
    let map = expect_mapping(value, document, path)?;
    for field in fields {
        if let Some(value) = map.get(*field) {
            expect_string(value, document, &join_path(path, field))?;
        }
    }
    Ok(())
}

/// Expect a YAML mapping or return a typed error.
fn expect_mapping<'a>(
    value: &'a Value,
    document: &str,
    path: &str,
) -> Result<&'a Mapping, ConfigError> {
    match value {
        Value::Mapping(map) => Ok(map),
        _ => Err(invalid_field(document, path, "expected mapping")),
    }
}

/// Expect a YAML string or return a typed error.
fn expect_string(value: &Value, document: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(document, path, "expected string"))
    }
}

/// Expect a YAML boolean or return a typed error.
fn expect_bool(value: &Value, document: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_bool() {
        Ok(())
    } else {
        Err(invalid_field(document, path, "expected bool"))
    }
}

/// Expect a non-negative YAML integer or return a typed error.
fn expect_u64(value: &Value, document: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(document, path, "expected non-negative integer"))
    }
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured schema error.
fn invalid_field(document: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::Schema {
        document: document.to_string(),
        path: normalized_path.to_string(),
        message: message.to_string(),
    }
}

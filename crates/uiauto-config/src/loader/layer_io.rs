//! IO helpers for reading config documents from disk.

use super::{DocumentSource, schema};
use crate::ConfigError;
use log::debug;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load a document that must exist.
pub(super) fn load_required_document(
    source: DocumentSource,
    path: &Path,
) -> Result<Value, ConfigError> {
    read_document(source, path)?.ok_or_else(|| ConfigError::Missing {
        path: path.to_path_buf(),
    })
}

/// Load a document if the file exists.
pub(super) fn load_optional_document(
    source: DocumentSource,
    path: &Path,
) -> Result<Option<Value>, ConfigError> {
    let loaded = read_document(source, path)?;
    if loaded.is_none() {
        debug!(
            "optional document missing (source={}, path={})",
            source.as_str(),
            path.display()
        );
    }
    Ok(loaded)
}

fn read_document(source: DocumentSource, path: &Path) -> Result<Option<Value>, ConfigError> {
    debug!(
        "reading config document (source={}, path={})",
        source.as_str(),
        path.display()
    );
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::ReadFailed {
                document: source.as_str(),
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    parse_document(source.as_str(), path, &contents).map(Some)
}

/// Parse YAML contents, expand `<<` merge keys and check the document shape.
///
/// Blank documents are empty mappings.
pub(crate) fn parse_document(
    document: &'static str,
    path: &Path,
    contents: &str,
) -> Result<Value, ConfigError> {
    let parse_error = |source: serde_yaml::Error| ConfigError::Parse {
        document,
        path: path.to_path_buf(),
        source,
    };
    let value: Value = if is_blank(contents) {
        Value::Null
    } else {
        let mut value: Value = serde_yaml::from_str(contents).map_err(parse_error)?;
        value.apply_merge().map_err(parse_error)?;
        value
    };
    let value = match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    };
    schema::validate_document(&value, document)?;
    Ok(value)
}

/// True for documents holding only whitespace and comments.
fn is_blank(contents: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

//! Configuration for a generation run.
//!
//! Options reach the template context from three places, applied in order:
//! an options file (JSON, YAML or TOML), `key=value` assignments, and
//! `Name=Value` default headers collected under the `default_headers` key.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use super::error::{Error, Result};
use crate::generation::Context;

/// Options key holding headers the generated client sends on every request
pub const DEFAULT_HEADERS_KEY: &str = "default_headers";

/// Resolved inputs of one generation run
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Path to the schema document
    pub schema_path: PathBuf,
    /// Template directory
    pub template_dir: PathBuf,
    /// Output directory for generated code
    pub output_dir: PathBuf,
    /// Caller options merged into the context
    pub options: Context,
}

/// Load an options mapping from a `.json`, `.yaml`/`.yml` or `.toml` file.
pub fn load_options_file(path: impl AsRef<Path>) -> Result<Context> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;

    let value: JsonValue = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("toml") => {
            let table: toml::Table = toml::from_str(&content)?;
            serde_json::to_value(table)?
        }
        _ => {
            return Err(Error::config(format!(
                "Unsupported options file format: {} (expected .json, .yaml, .yml or .toml)",
                path.display()
            )));
        }
    };

    match value {
        JsonValue::Object(map) => Ok(Context::from(map)),
        _ => Err(Error::config(format!(
            "Options file {} must contain a mapping",
            path.display()
        ))),
    }
}

/// Parse a `key=value` assignment. The value is read as JSON when it parses
/// (numbers, booleans, arrays, objects, quoted strings) and as a plain string
/// otherwise.
pub fn parse_assignment(assignment: &str) -> Result<(String, JsonValue)> {
    let (key, raw) = split_pair(assignment, "key=value")?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Parse a `Name=Value` header; the value is always a string.
pub fn parse_header(header: &str) -> Result<(String, String)> {
    let (name, value) = split_pair(header, "Name=Value")?;
    Ok((name.to_string(), value.to_string()))
}

fn split_pair<'a>(input: &'a str, expected: &str) -> Result<(&'a str, &'a str)> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(Error::config(format!(
            "Invalid assignment '{input}', expected {expected}"
        ))),
    }
}

/// Fold assignments and headers into `options`. Headers extend an existing
/// `default_headers` mapping.
pub fn apply_overrides(
    mut options: Context,
    assignments: &[String],
    headers: &[String],
) -> Result<Context> {
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        options.insert(key, value);
    }

    if !headers.is_empty() {
        let mut merged = match options.get(DEFAULT_HEADERS_KEY) {
            Some(JsonValue::Object(existing)) => existing.clone(),
            Some(_) => {
                return Err(Error::config(format!(
                    "'{DEFAULT_HEADERS_KEY}' option must be a mapping of header names to values"
                )));
            }
            None => Map::new(),
        };
        for header in headers {
            let (name, value) = parse_header(header)?;
            merged.insert(name, JsonValue::String(value));
        }
        options.insert(DEFAULT_HEADERS_KEY, JsonValue::Object(merged));
    }

    Ok(options)
}

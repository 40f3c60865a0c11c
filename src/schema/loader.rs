//! File-based schema loader
//!
//! This loader handles only file I/O and format detection. The actual parsing is
//! done by the [`SchemaParser`].

use std::path::Path;

use serde_json::Value as JsonValue;
use tracing::info;

use super::{Schema, SchemaParser};
use crate::core::error::{Error, Result};

/// Load and parse a schema document from a local JSON or YAML file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;

    let document = parse_document(path, &content)?;
    let schema = SchemaParser::new(document).parse()?;

    info!(
        path = %path.display(),
        resources = schema.resources.len(),
        "Loaded schema"
    );
    Ok(schema)
}

/// Parse content as JSON or YAML depending on the file extension; unknown
/// extensions try JSON first, then YAML.
fn parse_document(path: &Path, content: &str) -> Result<JsonValue> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
        _ => serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| Error::schema(format!("Failed to parse schema document: {e}"))),
    }
}

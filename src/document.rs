//! Reading and writing schema documents.
//!
//! `.json` files are read as JSON, `.yaml`/`.yml` as YAML. Anything else is
//! tried as JSON first, then YAML.

use crate::error::{DerefError, Result};
use serde_json::Value;
use std::path::Path;

/// Output encoding for a resolved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Read a document from disk.
pub fn load(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| DerefError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &content)
}

/// Parse document text, picking the format from `path`'s extension.
pub fn parse(path: &Path, content: &str) -> Result<Value> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => serde_json::from_str(content).map_err(|source| DerefError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("yaml" | "yml") => {
            serde_yaml::from_str(content).map_err(|source| DerefError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => serde_json::from_str::<Value>(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|_| DerefError::UnknownFormat {
                path: path.to_path_buf(),
            }),
    }
}

/// Render a document in the requested format.
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| DerefError::Render(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| DerefError::Render(e.to_string()))
        }
    }
}

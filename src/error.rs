//! Error types for loading documents and configuration.
//!
//! Resolution itself never fails; these only cover the I/O edges.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading inputs or configuration.
#[derive(Debug, Error)]
pub enum DerefError {
    /// A file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document was not valid JSON.
    #[error("Invalid JSON in '{}': {source}", path.display())]
    Json {
        /// Offending document.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document or config file was not valid YAML.
    #[error("Invalid YAML in '{}': {source}", path.display())]
    Yaml {
        /// Offending document.
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document with no recognised extension parsed as neither format.
    #[error("Unrecognised document format: '{}' is neither JSON nor YAML", path.display())]
    UnknownFormat {
        /// Offending document.
        path: PathBuf,
    },

    /// The lookup-table pointer does not address anything in the document.
    #[error("Definitions pointer '{pointer}' not found in document")]
    DefinitionsNotFound {
        /// JSON pointer that was looked up.
        pointer: String,
    },

    /// Writing the output failed.
    #[error("Failed to render output: {0}")]
    Render(String),
}

impl DerefError {
    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO",
            Self::Json { .. } => "INVALID_JSON",
            Self::Yaml { .. } => "INVALID_YAML",
            Self::UnknownFormat { .. } => "UNKNOWN_FORMAT",
            Self::DefinitionsNotFound { .. } => "DEFINITIONS_NOT_FOUND",
            Self::Render(_) => "RENDER",
        }
    }
}

/// Result alias for fallible loading operations.
pub type Result<T> = std::result::Result<T, DerefError>;

//! Configuration loader
//!
//! Options can come from a YAML file:
//!
//! ```yaml
//! hide_inherited_from: false
//! definitions: /definitions
//! ```
//!
//! Path resolution order:
//! 1. Explicit path passed to [`ConfigLoader::new`]
//! 2. `SCHEMA_DEREF_CONFIG` environment variable
//! 3. No file: defaults

use crate::error::{DerefError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SCHEMA_DEREF_CONFIG";

/// Options for a dereference run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DereferenceOptions {
    /// Suppress every provenance annotation.
    pub hide_inherited_from: bool,
    /// JSON pointer selecting the lookup table inside the document. The
    /// whole document is the table when unset.
    pub definitions: Option<String>,
}

impl DereferenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hide_inherited_from(mut self, hide: bool) -> Self {
        self.hide_inherited_from = hide;
        self
    }

    pub fn with_definitions(mut self, pointer: impl Into<String>) -> Self {
        self.definitions = Some(pointer.into());
        self
    }

    /// Layer command-line values over file options. A set flag turns hiding
    /// on; an unset flag leaves the file value alone.
    pub fn with_overrides(
        mut self,
        hide_inherited_from: bool,
        definitions: Option<String>,
    ) -> Self {
        if hide_inherited_from {
            self.hide_inherited_from = true;
        }
        if let Some(pointer) = definitions {
            self.definitions = Some(pointer);
        }
        self
    }
}

pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Create loader from SCHEMA_DEREF_CONFIG, or one that yields defaults.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        }
    }

    /// Explicit path if given, otherwise fall back to the environment.
    pub fn from_arg_or_env(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::new(path),
            None => Self::from_env(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load options. A loader without a path yields defaults.
    pub fn load(&self) -> Result<DereferenceOptions> {
        let Some(path) = &self.path else {
            return Ok(DereferenceOptions::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| DerefError::Io {
            path: path.clone(),
            source,
        })?;
        let options = Self::parse(&content).map_err(|source| DerefError::Yaml {
            path: path.clone(),
            source,
        })?;

        info!("Loaded dereference options from {}", path.display());
        Ok(options)
    }

    /// Parse options from YAML text. An empty document yields defaults.
    pub fn parse(content: &str) -> std::result::Result<DereferenceOptions, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(DereferenceOptions::default());
        }
        serde_yaml::from_str(content)
    }
}

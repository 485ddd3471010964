//! Generation settings
//!
//! A [`GeneratorConfig`] bundles the marker notation and the export options.
//! It is read once and stays constant for a whole generation run.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{NsdError, NsdResult};
use crate::intermediate::MarkerConfig;

/// Switches controlling what ends up in the generated text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Emit element texts verbatim instead of running the intermediate pipeline
    pub no_conversion: bool,
    /// Emit every instruction, call and jump as a comment
    pub instructions_as_comments: bool,
    /// Emit element comments
    pub export_comments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            no_conversion: false,
            instructions_as_comments: false,
            export_comments: true,
        }
    }
}

/// Everything a generator needs besides the diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub markers: MarkerConfig,
    pub options: ExportOptions,
}

impl GeneratorConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json_str(source: &str) -> NsdResult<Self> {
        serde_json::from_str(source).map_err(|e| NsdError::from_json(&e, source))
    }

    /// Read a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> NsdResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Self::from_json_str(&source).map_err(|e| match e {
            NsdError::Json { message, .. } => {
                NsdError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }
}

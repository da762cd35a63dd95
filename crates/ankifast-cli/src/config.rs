//! Configuration file support for ankifast CLI
//!
//! Loads settings from `_ankifast.toml` configuration file.

use anyhow::{Context, Result};
use ankifast_core::{ExportOptions, FileNaming};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_ankifast.toml";

/// Schema file referenced by generated configuration files
///
/// Written by `ankifast init --schema -o ankifast.schema.json`.
pub const SCHEMA_FILE_NAME: &str = "ankifast.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Export file configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Rendering configuration
    #[serde(skip_serializing_if = "RenderConfig::is_empty")]
    pub render: RenderConfig,
}

/// Export file configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix of export file names (default: "export-to-anki-")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Extension of export file names, without the dot (default: "txt")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Directory export files are written to (default: the note's directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_root: Option<PathBuf>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.extension.is_none() && self.vault_root.is_none()
    }
}

/// Rendering configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    /// Rewrite $...$ and $$...$$ math into [latex] markup (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex: Option<bool>,
    /// Render rows in parallel (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

impl RenderConfig {
    fn is_empty(&self) -> bool {
        self.latex.is_none() && self.parallel.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_ankifast.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// File naming with configured overrides
    pub fn file_naming(&self) -> FileNaming {
        let defaults = FileNaming::default();
        FileNaming {
            prefix: self.output.prefix.clone().unwrap_or(defaults.prefix),
            extension: self.output.extension.clone().unwrap_or(defaults.extension),
        }
    }

    /// Export options with configured overrides
    pub fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            latex: self.render.latex.unwrap_or(defaults.latex),
            parallel: self.render.parallel.unwrap_or(defaults.parallel),
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_FILE_NAME, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            output: OutputConfig {
                prefix: Some("export-to-anki-".to_string()),
                extension: Some("txt".to_string()),
                vault_root: None, // next to the note
            },
            render: RenderConfig {
                latex: Some(true),
                parallel: Some(true),
            },
        }
    }
}

//! CLI configuration file

use anyhow::{Context, Result};
use gemma_adapter_xml::XmlConfig;
use gemma_schema::loader::DEFAULT_ROOT_KEY;
use serde::Deserialize;
use std::path::Path;

/// Settings read from the optional `--config` YAML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Top-level key holding the schema tree (default: `properties`)
    pub schema_root: String,
    /// Spaces per indentation level in JSON output (default: 2)
    pub indent: usize,
    /// XML normalization conventions
    pub xml: XmlConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_root: DEFAULT_ROOT_KEY.to_string(),
            indent: 2,
            xml: XmlConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load the config file if one was given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("invalid config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config YAML; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, schema_root: Option<String>, indent: Option<usize>) -> Self {
        if let Some(schema_root) = schema_root {
            self.schema_root = schema_root;
        }
        if let Some(indent) = indent {
            self.indent = indent;
        }
        self
    }
}

//! Configuration for inference sessions and generated documents
//!
//! Everything has a default, so an empty file (or no file at all) is a
//! valid configuration. CLI flags are applied on top of what is loaded.

use crate::error::{Error, Result};
use crate::schema::{effective_max_samples, EmptyArrayItems, RequiredPolicy, DEFAULT_MAX_SAMPLES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Inference Config
// ============================================================================

/// Inference and document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Samples kept per field path (`0` means the default of 10)
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// Refine merged schemas with collected samples
    #[serde(default = "default_true")]
    pub refine: bool,

    /// How `required` sets combine across observations
    #[serde(default)]
    pub required_policy: RequiredPolicy,

    /// Items schema for empty arrays in single observations
    #[serde(default)]
    pub empty_array_items: EmptyArrayItems,

    /// Replace varying path segments with `{param}` templates
    #[serde(default = "default_true")]
    pub detect_path_patterns: bool,

    /// Document metadata
    #[serde(default)]
    pub document: DocumentConfig,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            refine: true,
            required_policy: RequiredPolicy::default(),
            empty_array_items: EmptyArrayItems::default(),
            detect_path_patterns: true,
            document: DocumentConfig::default(),
        }
    }
}

fn default_max_samples() -> usize {
    DEFAULT_MAX_SAMPLES
}

fn default_true() -> bool {
    true
}

impl InferenceConfig {
    /// Load configuration from a YAML (or JSON) file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path.display().to_string())
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<()> {
        if self.document.title.trim().is_empty() {
            return Err(Error::invalid_value("document.title", "must not be empty"));
        }
        if self.document.version.trim().is_empty() {
            return Err(Error::invalid_value("document.version", "must not be empty"));
        }
        for server in &self.document.servers {
            if server.url.trim().is_empty() {
                return Err(Error::invalid_value("document.servers", "server url must not be empty"));
            }
        }
        for (prefix, tag) in &self.document.tag_mappings {
            if tag.trim().is_empty() {
                return Err(Error::invalid_value(
                    "document.tag_mappings",
                    format!("tag for prefix '{prefix}' must not be empty"),
                ));
            }
        }
        Ok(())
    }

    /// Sample cap with `0` coerced to the default
    pub fn effective_max_samples(&self) -> usize {
        effective_max_samples(self.max_samples)
    }
}

// ============================================================================
// Document Config
// ============================================================================

/// OpenAPI `info`, `servers` and tagging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_api_version")]
    pub version: String,

    #[serde(default)]
    pub servers: Vec<ServerConfig>,

    /// Path prefix -> operation tag
    #[serde(default)]
    pub tag_mappings: BTreeMap<String, String>,

    /// Leading path segments skipped when deriving tags (`v1`, `v2`, ... are
    /// always skipped)
    #[serde(default = "default_version_prefixes")]
    pub version_prefixes: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            version: default_api_version(),
            servers: Vec::new(),
            tag_mappings: BTreeMap::new(),
            version_prefixes: default_version_prefixes(),
        }
    }
}

fn default_title() -> String {
    "API Documentation".to_string()
}

fn default_description() -> String {
    "Generated API documentation".to_string()
}

fn default_api_version() -> String {
    "1.0.0".to_string()
}

fn default_version_prefixes() -> Vec<String> {
    vec!["api".to_string()]
}

/// Server entry of the generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl ServerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

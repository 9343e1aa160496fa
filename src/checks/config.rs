//! Analysis thresholds.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```yaml
//! smells:
//!   deep_nesting: 3
//!   generic_names: [Block, Part]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading an [`AnalysisConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level analysis configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub smells: SmellConfig,
}

impl AnalysisConfig {
    /// Parse YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("loading analysis config from {}", path.display());
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            other => Err(ConfigError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smells.validate()
    }
}

/// Thresholds for the smell checks.
///
/// Counts are exclusive lower bounds: a check fires when the measured value
/// is strictly greater than its threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmellConfig {
    pub deep_nesting: usize,
    pub deep_nesting_high: usize,
    pub large_package: usize,
    pub large_package_high: usize,
    pub massive_block_ports: usize,
    pub massive_block_ports_high: usize,
    pub massive_block_attributes: usize,
    pub massive_block_attributes_high: usize,
    /// Normalized similarity above which two names are reported.
    pub similar_names: f64,
    /// Similarity above which the finding is Medium rather than Low.
    pub similar_names_high: f64,
    pub overloaded_diagram_type: usize,
    pub long_name: usize,
    /// Elements deeper than this multiple of the mean depth are imbalanced.
    pub depth_imbalance_factor: f64,
    /// Names too generic to compare for similarity (case-insensitive).
    pub generic_names: Vec<String>,
    /// Diagram name or type fragments marking tool-generated diagrams.
    pub technical_diagram_markers: Vec<String>,
}

impl Default for SmellConfig {
    fn default() -> Self {
        Self {
            deep_nesting: 4,
            deep_nesting_high: 6,
            large_package: 15,
            large_package_high: 25,
            massive_block_ports: 10,
            massive_block_ports_high: 20,
            massive_block_attributes: 15,
            massive_block_attributes_high: 25,
            similar_names: 0.88,
            similar_names_high: 0.94,
            overloaded_diagram_type: 30,
            long_name: 40,
            depth_imbalance_factor: 2.0,
            generic_names: [
                "block", "class", "element", "item", "model", "new", "object", "package", "part",
                "port", "system", "unnamed",
            ]
            .map(String::from)
            .to_vec(),
            technical_diagram_markers: ["profile", "legend", "template", "metamodel", "stereotype"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl SmellConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("similar_names", self.similar_names),
            ("similar_names_high", self.similar_names_high),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        if self.depth_imbalance_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "depth_imbalance_factor must be positive, got {}",
                self.depth_imbalance_factor
            )));
        }
        Ok(())
    }

    /// Is `name` on the generic list?
    pub fn is_generic(&self, name: &str) -> bool {
        let name = name.trim();
        self.generic_names.iter().any(|g| g.eq_ignore_ascii_case(name))
    }

    /// Does `text` contain a technical-diagram marker?
    pub fn is_technical_diagram(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.technical_diagram_markers
            .iter()
            .any(|m| !m.is_empty() && text.contains(&m.to_lowercase()))
    }
}

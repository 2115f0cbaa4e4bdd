use crate::error::{RagflowError, Result};
use crate::models::connection::{mask_secret, DEFAULT_TIMEOUT_SECS};
use crate::models::ConnectionConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default server address of a local RAGFlow deployment
pub const DEFAULT_BASE_URL: &str = "http://localhost:9380";

/// Upper bound for the number of chunks requested by a search
pub const MAX_TOP_K: usize = 50;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument or interactive prompt
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
            ConfigSource::Cli => "cli",
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration: defaults, then file, then environment, then CLI
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub base_url: ConfigValue<String>,
    pub api_key: ConfigValue<Option<String>>,
    pub timeout_secs: ConfigValue<u64>,
    pub top_k: ConfigValue<usize>,
    pub similarity_threshold: ConfigValue<f64>,
    pub vector_similarity_weight: ConfigValue<f64>,
    pub highlight: ConfigValue<bool>,
    pub keyword: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            base_url: ConfigValue::new(DEFAULT_BASE_URL.to_string(), ConfigSource::Default),
            api_key: ConfigValue::new(None, ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            top_k: ConfigValue::new(5, ConfigSource::Default),
            similarity_threshold: ConfigValue::new(0.2, ConfigSource::Default),
            vector_similarity_weight: ConfigValue::new(0.3, ConfigSource::Default),
            highlight: ConfigValue::new(true, ConfigSource::Default),
            keyword: ConfigValue::new(false, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| RagflowError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(base_url) = file_config.base_url {
            self.base_url.update(base_url, ConfigSource::File);
        }

        if let Some(api_key) = file_config.api_key.filter(|key| !key.is_empty()) {
            self.api_key.update(Some(api_key), ConfigSource::File);
        }

        if let Some(timeout) = file_config.timeout {
            self.timeout_secs.update(validate_timeout(timeout)?, ConfigSource::File);
        }

        if let Some(search) = file_config.search {
            if let Some(top_k) = search.top_k {
                self.top_k.update(validate_top_k(top_k)?, ConfigSource::File);
            }

            if let Some(threshold) = search.similarity_threshold {
                let threshold = validate_unit_interval("similarity_threshold", threshold)?;
                self.similarity_threshold.update(threshold, ConfigSource::File);
            }

            if let Some(weight) = search.vector_similarity_weight {
                let weight = validate_unit_interval("vector_similarity_weight", weight)?;
                self.vector_similarity_weight.update(weight, ConfigSource::File);
            }

            if let Some(highlight) = search.highlight {
                self.highlight.update(highlight, ConfigSource::File);
            }

            if let Some(keyword) = search.keyword {
                self.keyword.update(keyword, ConfigSource::File);
            }
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // RAGFLOW_BASE_URL
        if let Ok(base_url) = env::var("RAGFLOW_BASE_URL") {
            if base_url.trim().is_empty() {
                tracing::warn!("Ignoring empty RAGFLOW_BASE_URL");
            } else {
                self.base_url.update(base_url, ConfigSource::Environment);
            }
        }

        // RAGFLOW_API_KEY
        if let Ok(api_key) = env::var("RAGFLOW_API_KEY") {
            if !api_key.is_empty() {
                self.api_key.update(Some(api_key), ConfigSource::Environment);
            }
        }

        // RAGFLOW_TIMEOUT
        if let Ok(timeout_str) = env::var("RAGFLOW_TIMEOUT") {
            match parse_timeout(&timeout_str) {
                Ok(timeout) => self.timeout_secs.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid RAGFLOW_TIMEOUT value '{}': expected a positive number of seconds",
                    timeout_str
                ),
            }
        }

        // RAGFLOW_TOP_K
        if let Ok(top_k_str) = env::var("RAGFLOW_TOP_K") {
            match parse_top_k(&top_k_str) {
                Ok(top_k) => self.top_k.update(top_k, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid RAGFLOW_TOP_K value '{}': expected an integer between 1 and {}",
                    top_k_str,
                    MAX_TOP_K
                ),
            }
        }

        // RAGFLOW_SIMILARITY_THRESHOLD
        if let Ok(threshold_str) = env::var("RAGFLOW_SIMILARITY_THRESHOLD") {
            match parse_unit_interval("similarity_threshold", &threshold_str) {
                Ok(threshold) => {
                    self.similarity_threshold.update(threshold, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid RAGFLOW_SIMILARITY_THRESHOLD value '{}': expected a number between 0 and 1",
                    threshold_str
                ),
            }
        }

        // RAGFLOW_VECTOR_WEIGHT
        if let Ok(weight_str) = env::var("RAGFLOW_VECTOR_WEIGHT") {
            match parse_unit_interval("vector_similarity_weight", &weight_str) {
                Ok(weight) => {
                    self.vector_similarity_weight.update(weight, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid RAGFLOW_VECTOR_WEIGHT value '{}': expected a number between 0 and 1",
                    weight_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url.update(base_url, ConfigSource::Cli);
        }

        if let Some(api_key) = overrides.api_key.filter(|key| !key.is_empty()) {
            self.api_key.update(Some(api_key), ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs.update(timeout, ConfigSource::Cli);
        }
    }

    /// Build the client connection settings
    pub fn connection(&self) -> Result<ConnectionConfig> {
        let api_key = self
            .api_key
            .value
            .clone()
            .ok_or_else(|| RagflowError::ConfigMissing { key: "api_key".to_string() })?;

        Ok(ConnectionConfig::new(&self.base_url.value, api_key)
            .with_timeout(Duration::from_secs(self.timeout_secs.value)))
    }

    /// Get all configuration values for inspection, secrets masked
    pub fn to_inspection_entries(&self) -> Vec<(String, String, ConfigSource)> {
        vec![
            ("base_url".to_string(), self.base_url.value.clone(), self.base_url.source),
            (
                "api_key".to_string(),
                self.api_key
                    .value
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "(not set)".to_string()),
                self.api_key.source,
            ),
            (
                "timeout".to_string(),
                format!("{}s", self.timeout_secs.value),
                self.timeout_secs.source,
            ),
            ("top_k".to_string(), self.top_k.value.to_string(), self.top_k.source),
            (
                "similarity_threshold".to_string(),
                format!("{:.2}", self.similarity_threshold.value),
                self.similarity_threshold.source,
            ),
            (
                "vector_similarity_weight".to_string(),
                format!("{:.2}", self.vector_similarity_weight.value),
                self.vector_similarity_weight.source,
            ),
            ("highlight".to_string(), self.highlight.value.to_string(), self.highlight.source),
            ("keyword".to_string(), self.keyword.value.to_string(), self.keyword.source),
        ]
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
    pub search: Option<SearchFileConfig>,
}

/// `[search]` table of the config file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchFileConfig {
    pub top_k: Option<usize>,
    pub similarity_threshold: Option<f64>,
    pub vector_similarity_weight: Option<f64>,
    pub highlight: Option<bool>,
    pub keyword: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Parse a top-k value between 1 and [`MAX_TOP_K`]
pub fn parse_top_k(s: &str) -> Result<usize> {
    let top_k = s.trim().parse::<usize>().map_err(|_| RagflowError::ConfigInvalid {
        key: "top_k".to_string(),
        reason: format!("Invalid integer: {}", s),
    })?;
    validate_top_k(top_k)
}

/// Parse a score or weight in `[0.0, 1.0]`
pub fn parse_unit_interval(key: &str, s: &str) -> Result<f64> {
    let value = s.trim().parse::<f64>().map_err(|_| RagflowError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("Invalid number: {}", s),
    })?;
    validate_unit_interval(key, value)
}

/// Parse a timeout in whole seconds
pub fn parse_timeout(s: &str) -> Result<u64> {
    let timeout = s.trim().parse::<u64>().map_err(|_| RagflowError::ConfigInvalid {
        key: "timeout".to_string(),
        reason: format!("Invalid number of seconds: {}", s),
    })?;
    validate_timeout(timeout)
}

fn validate_top_k(top_k: usize) -> Result<usize> {
    if (1..=MAX_TOP_K).contains(&top_k) {
        Ok(top_k)
    } else {
        Err(RagflowError::ConfigInvalid {
            key: "top_k".to_string(),
            reason: format!("{} is outside 1..={}", top_k, MAX_TOP_K),
        })
    }
}

fn validate_unit_interval(key: &str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(RagflowError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("{} is outside 0.0..=1.0", value),
        })
    }
}

fn validate_timeout(timeout: u64) -> Result<u64> {
    if timeout == 0 {
        return Err(RagflowError::ConfigInvalid {
            key: "timeout".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    Ok(timeout)
}

//! Service configuration
//!
//! Loaded from YAML or TOML, chosen by file extension. Every field has a
//! default so a partial file is enough. Signing keys never come from here.

use crate::store::ConcurrencyMode;
use gmp_esign::DEFAULT_CONFIRMATION_TTL_SECS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default session lifetime: one eight-hour shift
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// YAML syntax or shape error
    #[error("invalid yaml: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// TOML syntax or shape error
    #[error("invalid toml: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// Extension is neither yaml/yml nor toml
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Logging settings for the binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Workflow service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Bearer token lifetime in seconds
    pub session_ttl_secs: u64,
    /// E-signature confirmation lifetime in seconds; 0 disables expiry
    pub confirmation_ttl_secs: u64,
    /// Restrict plant-bound actors to their own plant
    pub enforce_plant_scope: bool,
    /// Record store save policy
    pub concurrency: ConcurrencyMode,
    /// Logging
    pub log: LogConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            confirmation_ttl_secs: DEFAULT_CONFIRMATION_TTL_SECS,
            enforce_plant_scope: true,
            concurrency: ConcurrencyMode::Optimistic,
            log: LogConfig::default(),
        }
    }
}

impl WorkflowConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.yaml`, `.yml` or `.toml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&text),
            Some("toml") => Self::from_toml(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Parse YAML text
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(ConfigError::InvalidYaml)
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::InvalidToml)
    }

    /// With session lifetime
    #[inline]
    #[must_use]
    pub fn with_session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// With confirmation lifetime
    #[inline]
    #[must_use]
    pub fn with_confirmation_ttl_secs(mut self, secs: u64) -> Self {
        self.confirmation_ttl_secs = secs;
        self
    }

    /// With plant scoping on or off
    #[inline]
    #[must_use]
    pub fn with_plant_scope(mut self, enforce: bool) -> Self {
        self.enforce_plant_scope = enforce;
        self
    }

    /// With save policy
    #[inline]
    #[must_use]
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency = mode;
        self
    }

    /// With logging settings
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = WorkflowConfig::default();
        assert_eq!(cfg.session_ttl_secs, 28_800);
        assert_eq!(cfg.confirmation_ttl_secs, 300);
        assert!(cfg.enforce_plant_scope);
        assert_eq!(cfg.concurrency, ConcurrencyMode::Optimistic);
        assert_eq!(cfg.log.filter, "info");
    }

    #[test]
    fn partial_yaml() {
        let text = "concurrency: last_writer_wins\nlog:\n  json: true\n";
        let cfg = WorkflowConfig::from_yaml(text).unwrap();
        assert_eq!(cfg.concurrency, ConcurrencyMode::LastWriterWins);
        assert!(cfg.log.json);
        assert_eq!(cfg.log.filter, "info");
        assert_eq!(cfg.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    fn partial_toml() {
        let text = "enforce_plant_scope = false\n[log]\nfilter = \"debug\"\n";
        let cfg = WorkflowConfig::from_toml(text).unwrap();
        assert!(!cfg.enforce_plant_scope);
        assert_eq!(cfg.log.filter, "debug");
    }

    #[test]
    fn bad_yaml_is_reported() {
        let err = WorkflowConfig::from_yaml("session_ttl_secs: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml(_)));
    }
}
